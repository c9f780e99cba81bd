use actix_web::http::Method;

use crate::{
    auth::context::AuthenticationContext,
    errors::{AppError, AppResult},
    models::domain::Role,
};

pub const LOGIN_PATH: &str = "/auth/login";
pub const RANDOM_QUESTIONS_PATH: &str = "/questions/random";
pub const HEALTH_PATH: &str = "/manage/health-check";
pub const INFO_PATH: &str = "/manage/info";

const QUESTIONS_PATH: &str = "/questions";
const MANAGE_PATH: &str = "/manage";

/// Every route/operation the service distinguishes for access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    GetRandomQuestions,
    HealthProbe,
    InfoProbe,
    Management,
    ListQuestions,
    GetQuestion,
    CreateQuestion,
    UpdateQuestion,
    DeleteQuestion,
    Unmatched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    AnyRole(&'static [Role]),
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const READERS: &[Role] = &[Role::User, Role::Admin];

impl Operation {
    /// The rule table.
    pub fn requirement(self) -> Requirement {
        match self {
            Operation::Login
            | Operation::GetRandomQuestions
            | Operation::HealthProbe
            | Operation::InfoProbe => Requirement::Public,
            Operation::Management => Requirement::AnyRole(ADMIN_ONLY),
            Operation::ListQuestions | Operation::GetQuestion => Requirement::AnyRole(READERS),
            Operation::CreateQuestion | Operation::UpdateQuestion | Operation::DeleteQuestion => {
                Requirement::AnyRole(ADMIN_ONLY)
            }
            Operation::Unmatched => Requirement::Authenticated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "auth:login",
            Operation::GetRandomQuestions => "questions:random",
            Operation::HealthProbe => "manage:health",
            Operation::InfoProbe => "manage:info",
            Operation::Management => "manage:admin",
            Operation::ListQuestions => "questions:list",
            Operation::GetQuestion => "questions:get",
            Operation::CreateQuestion => "questions:create",
            Operation::UpdateQuestion => "questions:update",
            Operation::DeleteQuestion => "questions:delete",
            Operation::Unmatched => "unmatched",
        }
    }

    /// Maps a request onto its operation. Public paths match by exact
    /// equality only, ahead of the broader `/manage` and `/questions` rules.
    pub fn resolve(method: &Method, path: &str) -> Operation {
        match path {
            LOGIN_PATH => return Operation::Login,
            RANDOM_QUESTIONS_PATH => return Operation::GetRandomQuestions,
            HEALTH_PATH => return Operation::HealthProbe,
            INFO_PATH => return Operation::InfoProbe,
            _ => {}
        }

        if path == MANAGE_PATH || path.starts_with("/manage/") {
            return Operation::Management;
        }

        if path == QUESTIONS_PATH {
            return match *method {
                Method::GET | Method::HEAD => Operation::ListQuestions,
                Method::POST => Operation::CreateQuestion,
                _ => Operation::Unmatched,
            };
        }

        if is_question_item(path) {
            return match *method {
                Method::GET | Method::HEAD => Operation::GetQuestion,
                Method::PATCH | Method::PUT => Operation::UpdateQuestion,
                Method::DELETE => Operation::DeleteQuestion,
                _ => Operation::Unmatched,
            };
        }

        Operation::Unmatched
    }
}

/// `/questions/{id}`: exactly one non-empty segment after the collection.
fn is_question_item(path: &str) -> bool {
    path.strip_prefix("/questions/")
        .map(|rest| !rest.is_empty() && !rest.contains('/'))
        .unwrap_or(false)
}

/// Decides whether a request may proceed given its resolved identity.
/// Built once at startup, shared read-only.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn authorize(
        &self,
        operation: Operation,
        context: Option<&AuthenticationContext>,
    ) -> AppResult<()> {
        match (operation.requirement(), context) {
            (Requirement::Public, _) => Ok(()),
            (_, None) => Err(AppError::Unauthorized),
            (Requirement::Authenticated, Some(_)) => Ok(()),
            (Requirement::AnyRole(roles), Some(ctx)) => {
                if ctx.has_any_role(roles) {
                    Ok(())
                } else {
                    Err(AppError::Forbidden(format!(
                        "{} may not perform {}",
                        ctx.username,
                        operation.as_str()
                    )))
                }
            }
        }
    }

    pub fn authorize_request(
        &self,
        method: &Method,
        path: &str,
        context: Option<&AuthenticationContext>,
    ) -> AppResult<Operation> {
        let operation = Operation::resolve(method, path);
        self.authorize(operation, context)?;
        Ok(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AuthenticationContext {
        AuthenticationContext::new("admin", &[Role::Admin, Role::User])
    }

    fn user() -> AuthenticationContext {
        AuthenticationContext::new("user", &[Role::User])
    }

    fn nobody() -> AuthenticationContext {
        AuthenticationContext::new("ghost", &[])
    }

    #[test]
    fn test_public_paths_resolve_for_any_method() {
        for method in [Method::GET, Method::POST, Method::DELETE] {
            assert_eq!(Operation::resolve(&method, "/auth/login"), Operation::Login);
            assert_eq!(
                Operation::resolve(&method, "/questions/random"),
                Operation::GetRandomQuestions
            );
            assert_eq!(
                Operation::resolve(&method, "/manage/health-check"),
                Operation::HealthProbe
            );
            assert_eq!(Operation::resolve(&method, "/manage/info"), Operation::InfoProbe);
        }
    }

    #[test]
    fn test_public_paths_are_exact() {
        assert_eq!(
            Operation::resolve(&Method::GET, "/auth/login/extra"),
            Operation::Unmatched
        );
        assert_eq!(
            Operation::resolve(&Method::GET, "/manage/info/env"),
            Operation::Management
        );
        assert_eq!(
            Operation::resolve(&Method::GET, "/manage/health-check-verbose"),
            Operation::Management
        );
        assert_eq!(
            Operation::resolve(&Method::GET, "/questions/random/1"),
            Operation::Unmatched
        );
    }

    #[test]
    fn test_question_operations_are_keyed_by_method() {
        assert_eq!(
            Operation::resolve(&Method::GET, "/questions"),
            Operation::ListQuestions
        );
        assert_eq!(
            Operation::resolve(&Method::POST, "/questions"),
            Operation::CreateQuestion
        );
        assert_eq!(
            Operation::resolve(&Method::GET, "/questions/3"),
            Operation::GetQuestion
        );
        assert_eq!(
            Operation::resolve(&Method::PATCH, "/questions/3"),
            Operation::UpdateQuestion
        );
        assert_eq!(
            Operation::resolve(&Method::DELETE, "/questions/3"),
            Operation::DeleteQuestion
        );
        assert_eq!(
            Operation::resolve(&Method::POST, "/questions/3"),
            Operation::Unmatched
        );
        assert_eq!(
            Operation::resolve(&Method::GET, "/questions/"),
            Operation::Unmatched
        );
    }

    #[test]
    fn test_public_operations_ignore_context() {
        let policy = AuthorizationPolicy::new();

        assert!(policy.authorize(Operation::Login, None).is_ok());
        assert!(policy.authorize(Operation::GetRandomQuestions, Some(&nobody())).is_ok());
    }

    #[test]
    fn test_missing_context_is_unauthorized() {
        let policy = AuthorizationPolicy::new();

        for op in [
            Operation::Management,
            Operation::ListQuestions,
            Operation::CreateQuestion,
            Operation::Unmatched,
        ] {
            assert!(matches!(
                policy.authorize(op, None),
                Err(AppError::Unauthorized)
            ));
        }
    }

    #[test]
    fn test_role_mismatch_is_forbidden() {
        let policy = AuthorizationPolicy::new();

        assert!(policy.authorize(Operation::ListQuestions, Some(&user())).is_ok());
        assert!(policy.authorize(Operation::CreateQuestion, Some(&admin())).is_ok());
        assert!(matches!(
            policy.authorize(Operation::CreateQuestion, Some(&user())),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            policy.authorize(Operation::Management, Some(&user())),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            policy.authorize(Operation::GetQuestion, Some(&nobody())),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_unmatched_needs_any_identity() {
        let policy = AuthorizationPolicy::new();

        assert!(policy.authorize(Operation::Unmatched, Some(&nobody())).is_ok());
    }

    #[test]
    fn test_authorize_request_returns_operation() {
        let policy = AuthorizationPolicy::new();
        let op = policy
            .authorize_request(&Method::DELETE, "/questions/9", Some(&admin()))
            .unwrap();

        assert_eq!(op, Operation::DeleteQuestion);
    }
}
