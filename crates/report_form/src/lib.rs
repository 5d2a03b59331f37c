//! Daily report form: schema, draft state, submission state machine and
//! toast notifications.

mod controller;
pub mod draft;
pub mod notification;
pub mod schema;

pub use controller::{FormController, FormPhase, FormSnapshot, SubmissionFailure, SubmitResult};
pub use draft::Draft;
pub use notification::{Notification, NotificationVariant, NOTIFICATION_DURATION};
pub use schema::{FormSchema, FormVariant, SuccessPolicy};
