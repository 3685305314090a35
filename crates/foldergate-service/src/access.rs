//! Role-based access policy for folder-field operations.

use async_trait::async_trait;
use uuid::Uuid;

use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;
use foldergate_core::traits::access::{AccessMode, AccessPolicy, UserRole};

/// Role-based access policy: viewers may read, editors and admins may
/// read and write.
#[derive(Debug, Clone, Default)]
pub struct RoleAccessPolicy;

#[async_trait]
impl AccessPolicy for RoleAccessPolicy {
    async fn check_field_access(
        &self,
        user_id: Uuid,
        role: UserRole,
        model: &str,
        record_id: Uuid,
        field: &str,
        mode: AccessMode,
    ) -> AppResult<()> {
        let allowed = match mode {
            AccessMode::Read => true,
            AccessMode::Write => matches!(role, UserRole::Editor | UserRole::Admin),
        };
        if !allowed {
            tracing::debug!(
                %user_id, model, %record_id, field,
                "Write access denied for role {role:?}"
            );
            return Err(AppError::access_denied(format!(
                "You are not allowed to modify {model}.{field}"
            )));
        }
        Ok(())
    }
}
