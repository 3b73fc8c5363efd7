use super::{Field, Form, FormState};
use crate::error::ValidationError;
use estate_common::api::UserCreateRequest;
use estate_common::domain::Role;

pub struct UserCreateForm {
    state: FormState,
}

impl UserCreateForm {
    pub fn new() -> Self {
        Self {
            state: FormState::new(vec![
                Field::new("username", "Username"),
                Field::new("password", "Password").secret(),
                Field::new("name", "Name"),
                Field::new("role", "Role (ADMIN, RESIDENT)").value(Role::Resident.as_str()),
                Field::new("house_number", "House number"),
                Field::new("phone", "Phone (optional)"),
            ]),
        }
    }
}

impl Default for UserCreateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for UserCreateForm {
    type Request = UserCreateRequest;

    fn title(&self) -> &'static str {
        "Create user"
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn validate(&self) -> Result<UserCreateRequest, ValidationError> {
        let username = self.state.required("username", "Enter a username")?;
        let password = self.state.required("password", "Enter a password")?;
        let name = self.state.required("name", "Enter a name")?;
        let role: Role = self.state.parsed(
            "role",
            "Choose a role",
            "Role must be ADMIN or RESIDENT",
        )?;
        let house_number = match role {
            Role::Admin => self.state.optional("house_number"),
            Role::Resident => Some(self.state.required("house_number", "Enter a house number")?),
        };

        Ok(UserCreateRequest {
            username,
            password,
            name,
            house_number,
            phone: self.state.optional("phone"),
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> UserCreateForm {
        let mut form = UserCreateForm::new();
        form.state_mut().set("username", "wang");
        form.state_mut().set("password", "secret1");
        form.state_mut().set("name", "Wang Fang");
        form
    }

    #[test]
    fn residents_need_a_house() {
        let mut form = filled();
        assert_eq!(form.validate().unwrap_err().message, "Enter a house number");

        form.state_mut().set("house_number", "B202");
        assert_eq!(form.validate().unwrap().house_number.as_deref(), Some("B202"));
    }

    #[test]
    fn admins_do_not() {
        let mut form = filled();
        form.state_mut().set("role", "admin");
        let req = form.validate().unwrap();
        assert_eq!(req.role, Role::Admin);
        assert_eq!(req.house_number, None);

        form.state_mut().set("role", "owner");
        assert_eq!(
            form.validate().unwrap_err().message,
            "Role must be ADMIN or RESIDENT"
        );
    }
}
