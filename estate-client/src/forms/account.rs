use super::{Field, Form, FormState};
use crate::error::ValidationError;
use estate_common::api::{LoginRequest, RegisterRequest};

pub const EMPTY_CREDENTIALS: &str = "Username and password must not be empty";
const MIN_PASSWORD: usize = 6;

#[derive(Debug, Clone)]
pub struct LoginForm {
    state: FormState,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            state: FormState::new(vec![
                Field::new("username", "Username"),
                Field::new("password", "Password").secret(),
            ]),
        }
    }

    /// Prefills the username kept after a soft logout.
    pub fn with_username(mut self, username: Option<String>) -> Self {
        if let Some(username) = username {
            self.state.set("username", username);
        }
        self
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LoginForm {
    type Request = LoginRequest;

    fn title(&self) -> &'static str {
        "Log in"
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let username = self.state.required("username", EMPTY_CREDENTIALS)?;
        // Passwords are sent as typed.
        let password = self.state.get("password");
        if password.is_empty() {
            return Err(ValidationError::new("password", EMPTY_CREDENTIALS));
        }
        Ok(LoginRequest {
            username,
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    state: FormState,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self {
            state: FormState::new(vec![
                Field::new("username", "Username"),
                Field::new("password", "Password").secret(),
                Field::new("confirm", "Confirm password").secret(),
                Field::new("name", "Name"),
                Field::new("house_number", "House number"),
                Field::new("phone", "Phone (optional)"),
            ]),
        }
    }
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for RegisterForm {
    type Request = RegisterRequest;

    fn title(&self) -> &'static str {
        "Register"
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let username = self.state.required("username", "Enter a username")?;
        let password = self.state.get("password");
        if password.is_empty() {
            return Err(ValidationError::new("password", "Enter a password"));
        }
        if password.chars().count() < MIN_PASSWORD {
            return Err(ValidationError::new(
                "password",
                format!("Password must be at least {MIN_PASSWORD} characters"),
            ));
        }
        if self.state.get("confirm") != password {
            return Err(ValidationError::new("confirm", "Passwords do not match"));
        }
        let name = self.state.required("name", "Enter your name")?;
        let house_number = self.state.required("house_number", "Enter your house number")?;

        Ok(RegisterRequest {
            username,
            password: password.to_string(),
            name,
            house_number,
            phone: self.state.optional("phone"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_needs_both_fields() {
        let mut form = LoginForm::new();
        assert_eq!(form.validate().unwrap_err().message, EMPTY_CREDENTIALS);

        form.state_mut().set("username", "li");
        assert_eq!(form.validate().unwrap_err().field, "password");

        form.state_mut().set("password", "secret");
        let req = form.validate().unwrap();
        assert_eq!(req.username, "li");
        assert_eq!(req.password, "secret");
    }

    #[test]
    fn register_checks_in_order() {
        let mut form = RegisterForm::new();
        let state = form.state_mut();
        state.set("username", "li");
        state.set("password", "12345");
        assert_eq!(
            form.validate().unwrap_err().message,
            "Password must be at least 6 characters"
        );

        form.state_mut().set("password", "123456");
        form.state_mut().set("confirm", "123457");
        assert_eq!(form.validate().unwrap_err().message, "Passwords do not match");

        form.state_mut().set("confirm", "123456");
        assert_eq!(form.validate().unwrap_err().field, "name");

        form.state_mut().set("name", "Li Lei");
        assert_eq!(form.validate().unwrap_err().field, "house_number");

        form.state_mut().set("house_number", "A101");
        let req = form.validate().unwrap();
        assert_eq!(req.house_number, "A101");
        assert_eq!(req.phone, None);
    }
}
