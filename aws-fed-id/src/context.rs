use aws_fed_id_core::{Context, OsEnv};
use aws_fed_id_file_read_tokio::TokioFileRead;

/// Create a [`Context`] backed by the process environment and tokio's
/// file system.
pub fn default_context() -> Context {
    Context::new().with_file_read(TokioFileRead).with_env(OsEnv)
}
