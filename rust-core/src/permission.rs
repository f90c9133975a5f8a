//! Motion sensor permission capability.
//!
//! Some platforms gate motion events behind an explicit, asynchronous user
//! grant; others deliver them unconditionally. The capability is detected
//! once, up front, and each case has its own code path.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::MonitorError;
use crate::types::PermissionStatus;

/// Future returned by a permission request.
pub type PermissionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<PermissionStatus, MonitorError>> + Send + 'a>>;

/// An asynchronous "request motion permission" call.
pub trait MotionPermission: Send + Sync {
    /// Asks the platform for access to motion events.
    ///
    /// An `Err` means the request mechanism itself failed, which callers
    /// treat like a denial.
    fn request(&self) -> PermissionFuture<'_>;
}

/// How a platform grants access to motion events.
#[derive(Clone, Default)]
pub enum PermissionCapability {
    /// No request mechanism; access is implicitly granted.
    #[default]
    Implicit,
    /// Access must be requested before attaching a listener.
    Explicit(Arc<dyn MotionPermission>),
}

impl PermissionCapability {
    pub fn explicit(permission: impl MotionPermission + 'static) -> Self {
        PermissionCapability::Explicit(Arc::new(permission))
    }

    pub fn requires_request(&self) -> bool {
        matches!(self, PermissionCapability::Explicit(_))
    }
}

impl std::fmt::Debug for PermissionCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionCapability::Implicit => f.write_str("Implicit"),
            PermissionCapability::Explicit(_) => f.write_str("Explicit(..)"),
        }
    }
}

/// A permission prompt that always answers with the same status.
#[derive(Debug, Clone, Copy)]
pub struct FixedPermission(pub PermissionStatus);

impl MotionPermission for FixedPermission {
    fn request(&self) -> PermissionFuture<'_> {
        let status = self.0;
        Box::pin(async move { Ok(status) })
    }
}
