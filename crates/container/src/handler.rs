use hivemind_model::ContainerError;

/// Policy for recoverable definition-time problems: unknown extension
/// targets, visibility violations, duplicate defaults, occurrence-count
/// violations.
///
/// Construction-time errors never pass through here; they always fail the
/// triggering call.
pub trait ErrorHandler: Send + Sync {
	/// Reports one problem. `Err` aborts the registry build; `Ok` drops the
	/// offending extension and continues.
	fn error(&self, error: ContainerError) -> Result<(), ContainerError>;
}

/// Aborts the build on the first problem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictErrorHandler;

impl ErrorHandler for StrictErrorHandler {
	fn error(&self, error: ContainerError) -> Result<(), ContainerError> {
		Err(error)
	}
}

/// Logs each problem and keeps building; the offending extension is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingErrorHandler;

impl ErrorHandler for LoggingErrorHandler {
	fn error(&self, error: ContainerError) -> Result<(), ContainerError> {
		tracing::error!(%error, "registry definition problem");
		Ok(())
	}
}
