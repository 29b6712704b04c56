//! Role checks for protected operations.

use docqa_core::models::Role;
use docqa_core::AppError;

use crate::auth::models::AuthContext;

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    DeleteFile,
    ListFiles,
    /// Registering a role other than `Worker` while registration is restricted
    RegisterPrivileged,
}

impl Operation {
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Operation::Upload => &[Role::Ceo, Role::Manager, Role::Admin],
            Operation::DeleteFile => &[Role::Ceo, Role::Admin],
            Operation::ListFiles => &Role::ALL,
            Operation::RegisterPrivileged => &[Role::Ceo, Role::Admin],
        }
    }
}

/// Allow iff `role` is in the operation's role set.
pub fn authorize(role: Role, operation: Operation) -> Result<(), AppError> {
    if operation.allowed_roles().contains(&role) {
        Ok(())
    } else {
        tracing::debug!(role = %role, operation = ?operation, "Operation denied");
        Err(AppError::Forbidden(format!(
            "Role {} may not perform {:?}",
            role, operation
        )))
    }
}

/// True when registering `requested` needs an authenticated caller. When this is
/// false the caller's token is not consulted.
pub fn registration_requires_caller(open_registration: bool, requested: Role) -> bool {
    !open_registration && requested != Role::Worker
}

/// Decide whether `caller` may register an account with `requested` role.
///
/// With open registration anyone may register any role. Otherwise anonymous
/// callers may only create `Worker` accounts.
pub fn authorize_registration(
    open_registration: bool,
    requested: Role,
    caller: Option<&AuthContext>,
) -> Result<(), AppError> {
    if !registration_requires_caller(open_registration, requested) {
        return Ok(());
    }
    match caller {
        Some(ctx) => authorize(ctx.role, Operation::RegisterPrivileged),
        None => Err(AppError::MissingToken(format!(
            "Registering a {} account requires a bearer token",
            requested
        ))),
    }
}
