//! What each kind of record lets the user do from its list screen.

use super::form::{Dialog, DynDialog};
use crate::command::rows::Row;
use estate_client::api_client::ApiClient;
use estate_client::error::{ApiError, ClientResult};
use estate_client::forms::{
    check_payable, BuildingForm, ComplaintForm, ComplaintUpdateForm, FeeAddForm, HouseForm,
    ParkingForm, RepairForm, RepairUpdateForm, UserCreateForm,
};
use estate_client::gateway::Record;
use estate_client::session::Session;
use estate_common::api::{
    BuildingResponse, ComplaintResponse, FeeResponse, HouseResponse, ParkingResponse,
    RegistrationResponse, RepairResponse, UserResponse,
};
use estate_common::domain::Role;
use futures_util::future::{BoxFuture, FutureExt};

/// A pending write plus the notice shown when it succeeds.
pub(super) struct Mutation {
    pub(super) success: &'static str,
    pub(super) fut: BoxFuture<'static, ClientResult<()>>,
}

pub(super) enum Action {
    Dialog(Box<dyn DynDialog>),
    Confirm { message: String, mutation: Mutation },
    Run(Mutation),
    Refuse(ApiError),
    OpenHouses(u64),
}

fn dialog<D: DynDialog + 'static>(dialog: D) -> Option<Action> {
    Some(Action::Dialog(Box::new(dialog)))
}

fn confirm(
    message: impl Into<String>,
    success: &'static str,
    fut: BoxFuture<'static, ClientResult<()>>,
) -> Option<Action> {
    Some(Action::Confirm {
        message: message.into(),
        mutation: Mutation { success, fut },
    })
}

/// Key bindings of a list screen: `a` create, `e` edit, `Enter` primary,
/// `x` secondary, `d` delete.
pub(super) trait Screen: Record + Row {
    fn create(_session: &Session, _parent: Option<u64>) -> Option<Action> {
        None
    }

    fn edit(&self, _session: &Session) -> Option<Action> {
        None
    }

    fn primary(&self, _api: &ApiClient, _session: &Session) -> Option<Action> {
        None
    }

    fn secondary(&self, _api: &ApiClient, _session: &Session) -> Option<Action> {
        None
    }

    fn delete(&self, _api: &ApiClient, _session: &Session) -> Option<Action> {
        None
    }
}

impl Screen for FeeResponse {
    fn create(session: &Session, _parent: Option<u64>) -> Option<Action> {
        if !session.is_admin() {
            return Some(Action::Refuse(ApiError::NotPermitted));
        }
        dialog(Dialog::new(FeeAddForm::new(), "Fee added", |api, session, req| {
            async move { api.fees().add(&session, &req).await }.boxed()
        }))
    }

    fn primary(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        let req = match check_payable(session, self) {
            Ok(req) => req,
            Err(err) => return Some(Action::Refuse(err.into())),
        };
        let (api, session) = (api.clone(), session.clone());
        confirm(
            format!("Pay {:.2} for {}?", self.amount, self.month),
            "Payment successful",
            async move { api.fees().pay(&session, req.fee_id).await }.boxed(),
        )
    }

    fn edit(&self, _session: &Session) -> Option<Action> {
        Some(Action::Refuse(ApiError::Unsupported("Editing fees")))
    }

    fn delete(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        if !session.is_admin() {
            return None;
        }
        let (api, session, id) = (api.clone(), session.clone(), self.id);
        confirm(
            format!("Delete fee {id}?"),
            "Fee deleted",
            async move { api.fees().delete(&session, id).await }.boxed(),
        )
    }
}

impl Screen for RepairResponse {
    fn create(session: &Session, _parent: Option<u64>) -> Option<Action> {
        dialog(Dialog::new(
            RepairForm::for_session(session),
            "Repair request submitted",
            |api, session, req| async move { api.repairs().submit(&session, &req).await }.boxed(),
        ))
    }

    fn edit(&self, session: &Session) -> Option<Action> {
        if !session.is_admin() {
            return None;
        }
        dialog(Dialog::new(
            RepairUpdateForm::new(self),
            "Repair updated",
            |api, session, req| async move { api.repairs().update(&session, &req).await }.boxed(),
        ))
    }

    fn delete(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        let (api, session, id) = (api.clone(), session.clone(), self.id);
        confirm(
            format!("Delete repair request {id}?"),
            "Repair request deleted",
            async move { api.repairs().delete(&session, id).await }.boxed(),
        )
    }
}

impl Screen for ComplaintResponse {
    fn create(session: &Session, _parent: Option<u64>) -> Option<Action> {
        dialog(Dialog::new(
            ComplaintForm::for_session(session),
            "Complaint submitted",
            |api, session, req| async move { api.complaints().submit(&session, &req).await }.boxed(),
        ))
    }

    fn edit(&self, session: &Session) -> Option<Action> {
        if !session.is_admin() {
            return None;
        }
        dialog(Dialog::new(
            ComplaintUpdateForm::new(self),
            "Complaint updated",
            |api, session, req| async move { api.complaints().update(&session, &req).await }.boxed(),
        ))
    }

    fn delete(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        let (api, session, id) = (api.clone(), session.clone(), self.id);
        confirm(
            format!("Delete complaint {id}?"),
            "Complaint deleted",
            async move { api.complaints().delete(&session, id).await }.boxed(),
        )
    }
}

fn save_parking(
    api: ApiClient,
    session: Session,
    req: estate_common::api::ParkingRequest,
) -> BoxFuture<'static, ClientResult<()>> {
    async move {
        match req.id {
            Some(_) => api.parking().update(&session, &req).await,
            None => api.parking().add(&session, &req).await,
        }
    }
    .boxed()
}

impl Screen for ParkingResponse {
    fn create(session: &Session, _parent: Option<u64>) -> Option<Action> {
        if !session.is_admin() {
            return Some(Action::Refuse(ApiError::NotPermitted));
        }
        dialog(Dialog::new(ParkingForm::new(), "Parking space added", save_parking))
    }

    fn edit(&self, session: &Session) -> Option<Action> {
        if !session.is_admin() {
            return None;
        }
        dialog(Dialog::new(ParkingForm::edit(self), "Parking space updated", save_parking))
    }

    fn delete(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        if !session.is_admin() {
            return None;
        }
        let (api, session, id) = (api.clone(), session.clone(), self.id);
        confirm(
            format!("Delete parking space {}?", self.parking_number),
            "Parking space deleted",
            async move { api.parking().delete(&session, id).await }.boxed(),
        )
    }
}

fn save_building(
    api: ApiClient,
    session: Session,
    req: estate_common::api::BuildingRequest,
) -> BoxFuture<'static, ClientResult<()>> {
    async move {
        match req.id {
            Some(_) => api.buildings().update(&session, &req).await,
            None => api.buildings().add(&session, &req).await,
        }
    }
    .boxed()
}

impl Screen for BuildingResponse {
    fn create(_session: &Session, _parent: Option<u64>) -> Option<Action> {
        dialog(Dialog::new(BuildingForm::new(), "Building added", save_building))
    }

    fn edit(&self, _session: &Session) -> Option<Action> {
        dialog(Dialog::new(BuildingForm::edit(self), "Building updated", save_building))
    }

    fn primary(&self, _api: &ApiClient, _session: &Session) -> Option<Action> {
        Some(Action::OpenHouses(self.id))
    }

    fn delete(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        let (api, session, id) = (api.clone(), session.clone(), self.id);
        confirm(
            format!("Delete building {}?", self.building_number),
            "Building deleted",
            async move { api.buildings().delete(&session, id).await }.boxed(),
        )
    }
}

fn save_house(
    api: ApiClient,
    session: Session,
    req: estate_common::api::HouseRequest,
) -> BoxFuture<'static, ClientResult<()>> {
    async move {
        match req.id {
            Some(_) => api.houses().update(&session, &req).await,
            None => api.houses().add(&session, &req).await,
        }
    }
    .boxed()
}

impl Screen for HouseResponse {
    fn create(_session: &Session, parent: Option<u64>) -> Option<Action> {
        let form = match parent {
            Some(building_id) => HouseForm::in_building(building_id),
            None => HouseForm::new(),
        };
        dialog(Dialog::new(form, "House added", save_house))
    }

    fn edit(&self, _session: &Session) -> Option<Action> {
        dialog(Dialog::new(HouseForm::edit(self), "House updated", save_house))
    }

    fn delete(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        let (api, session, id) = (api.clone(), session.clone(), self.id);
        confirm(
            format!("Delete house {}?", self.house_number),
            "House deleted",
            async move { api.houses().delete(&session, id).await }.boxed(),
        )
    }
}

impl Screen for UserResponse {
    fn create(_session: &Session, _parent: Option<u64>) -> Option<Action> {
        dialog(Dialog::new(UserCreateForm::new(), "User created", |api, session, req| {
            async move { api.users().create(&session, &req).await }.boxed()
        }))
    }

    fn delete(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        let (api, session, user) = (api.clone(), session.clone(), self.clone());
        let message = format!("Delete user {}?", user.username);
        let fut = async move { api.users().delete(&session, &user).await }.boxed();
        if self.role == Role::Admin {
            // Refused locally, no need to ask first.
            return Some(Action::Run(Mutation {
                success: "User deleted",
                fut,
            }));
        }
        confirm(message, "User deleted", fut)
    }
}

impl Screen for RegistrationResponse {
    fn primary(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        let (api, session, id) = (api.clone(), session.clone(), self.id);
        Some(Action::Run(Mutation {
            success: "Registration approved",
            fut: async move { api.registrations().approve(&session, id).await }.boxed(),
        }))
    }

    fn secondary(&self, api: &ApiClient, session: &Session) -> Option<Action> {
        let (api, session, id) = (api.clone(), session.clone(), self.id);
        confirm(
            format!("Reject the registration of {}?", self.username),
            "Registration rejected",
            async move { api.registrations().reject(&session, id).await }.boxed(),
        )
    }
}
