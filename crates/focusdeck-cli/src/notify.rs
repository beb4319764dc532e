use focusdeck_core::{NotificationPermission, Notifier};
use notify_rust::Notification;

/// Desktop notifications through the OS notification service.
///
/// Desktop notification daemons have no permission prompt, so asking is
/// always granted; `--quiet` hosts use [`focusdeck_core::timer::NullNotifier`].
pub struct DesktopNotifier {
    permission: NotificationPermission,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            permission: NotificationPermission::Default,
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        self.permission = NotificationPermission::Granted;
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) {
        if let Err(e) = Notification::new()
            .appname("focusdeck")
            .summary(title)
            .body(body)
            .show()
        {
            tracing::warn!(error = %e, "failed to show notification");
        }
    }
}
