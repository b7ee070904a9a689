//! Member-facing rendering of command errors

use kernel::error::app_error::AppError;
use pin_gate::GateError;
use platform::http::BackendError;
use wallet::WalletError;

/// Map a command error onto the shared error shape
///
/// Errors that did not come from the gate, the wallet or the backend are
/// console input mistakes; `None` keeps their own text.
pub fn to_app_error(err: &anyhow::Error) -> Option<AppError> {
    if let Some(e) = err.downcast_ref::<GateError>() {
        Some(e.to_app_error())
    } else if let Some(e) = err.downcast_ref::<WalletError>() {
        Some(e.to_app_error())
    } else {
        err.downcast_ref::<BackendError>()
            .map(BackendError::to_app_error)
    }
}

/// One or two lines: the message, then the suggested next step
pub fn render(err: &anyhow::Error) -> String {
    match to_app_error(err) {
        Some(app) => match app.action() {
            Some(action) => format!("error: {}\n  {action}", app.message()),
            None => format!("error: {}", app.message()),
        },
        None => format!("error: {err:#}"),
    }
}
