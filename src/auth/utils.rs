use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
};

pub fn require_teacher(claims: &Claims) -> AppResult<()> {
    if !claims.is_teacher() {
        return Err(AppError::Forbidden(
            "Only teachers can perform this action".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserRole;

    fn create_test_claims(user_id: &str, role: UserRole) -> Claims {
        Claims {
            sub: user_id.to_string(),
            username: user_id.to_string(),
            role,
            iat: 0,
            exp: 9999999999,
        }
    }

    #[test]
    fn test_require_teacher_success() {
        let claims = create_test_claims("t1", UserRole::Teacher);
        assert!(require_teacher(&claims).is_ok());
    }

    #[test]
    fn test_require_teacher_failure() {
        let claims = create_test_claims("s1", UserRole::Student);
        assert!(matches!(require_teacher(&claims), Err(AppError::Forbidden(_))));
    }
}
