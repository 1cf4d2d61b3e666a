mod factory;
mod local_stream;
mod schema;
mod walk;

pub use factory::LocalStreamFactory;
pub use local_stream::{FileFormat, LocalConfig, LocalProvider, LocalStream, SOURCE_FILE_COLUMN};
pub use schema::{connection_specification, local_source, DOCUMENTATION_URL};
