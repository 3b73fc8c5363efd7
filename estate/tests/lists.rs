mod helpers;

use estate_client::controller::{ListController, Phase};
use estate_client::error::{ApiError, FORBIDDEN, MISSING_HOUSE_NUMBER};
use estate_common::api::{BuildingResponse, HouseResponse};
use estate_common::domain::Role;
use helpers::{fee, ok, page, registration, TestApp};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, Request, Respond, ResponseTemplate};

fn building(id: u64, number: &str, name: &str) -> BuildingResponse {
    BuildingResponse {
        id,
        building_number: number.into(),
        building_name: name.into(),
        total_floors: 18,
        total_units: 2,
        building_type: Some("residential".into()),
        completion_date: None,
        status: "IN_USE".into(),
        create_time: None,
        update_time: None,
    }
}

fn house(id: u64, house_number: &str) -> HouseResponse {
    HouseResponse {
        id,
        building_id: 1,
        building_number: Some("A".into()),
        building_name: Some("Garden".into()),
        house_number: house_number.into(),
        floor: 1,
        unit_type: None,
        area: Some(88.5),
        room_count: Some(3),
        living_room_count: Some(1),
        bathroom_count: Some(1),
        orientation: None,
        house_status: "OCCUPIED".into(),
        owner_name: None,
        owner_phone: None,
        resident_name: None,
        resident_phone: None,
        create_time: None,
        update_time: None,
    }
}

#[tokio::test]
async fn resident_fees_fit_on_one_page() {
    let mut app = TestApp::build().await.unwrap();
    app.login_as(Role::Resident, Some("A101"));

    Mock::given(method("GET"))
        .and(path("/api/fee/my"))
        .and(query_param("houseNumber", "A101"))
        .and(query_param("pageNum", "1"))
        .and(query_param("pageSize", "20"))
        .respond_with(ok(page(
            vec![fee(1, "A101"), fee(2, "A101"), fee(3, "A101")],
            1,
            1,
            20,
            3,
        )))
        .expect(1)
        .mount(&app.server)
        .await;

    let session = app.api.session();
    let mut controller = ListController::new(app.api.fees(), 20, app.api.notifier().clone());
    controller.reload(&session).await.unwrap();

    assert_eq!(controller.records().len(), 3);
    assert!(controller.is_last_page());
    assert_eq!(controller.phase(), Phase::Exhausted);

    // Scrolling to the end asks for nothing more.
    assert!(!controller.more(&session, 2).await);
    assert!(app.notices().is_empty());
}

#[tokio::test]
async fn resident_without_house_number_fetches_nothing() {
    let mut app = TestApp::build().await.unwrap();
    app.login_as(Role::Resident, None);

    Mock::given(method("GET"))
        .respond_with(ok(page(vec![fee(1, "A101")], 1, 1, 20, 1)))
        .expect(0)
        .mount(&app.server)
        .await;

    let session = app.api.session();
    let mut controller = ListController::new(app.api.fees(), 20, app.api.notifier().clone());
    let err = controller.reload(&session).await.unwrap_err();

    assert_eq!(err, ApiError::MissingHouseNumber);
    assert_eq!(app.errors(), vec![MISSING_HOUSE_NUMBER.to_string()]);
}

#[tokio::test]
async fn residents_cannot_open_admin_lists() {
    let mut app = TestApp::build().await.unwrap();
    app.login_as(Role::Resident, Some("A101"));

    Mock::given(method("GET"))
        .respond_with(ok(Vec::<u8>::new()))
        .expect(0)
        .mount(&app.server)
        .await;

    let session = app.api.session();
    let mut controller =
        ListController::new(app.api.registrations(), 20, app.api.notifier().clone());
    let err = controller.reload(&session).await.unwrap_err();

    assert_eq!(err, ApiError::NotPermitted);
    assert_eq!(app.errors(), vec![FORBIDDEN.to_string()]);
}

#[tokio::test]
async fn resident_search_goes_remote_and_clearing_restores_the_list() {
    let app = TestApp::build().await.unwrap();
    app.login_as(Role::Resident, Some("A101"));

    Mock::given(method("GET"))
        .and(path("/api/fee/my"))
        .respond_with(ok(page(vec![fee(1, "A101"), fee(2, "A101")], 1, 1, 20, 2)))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/fee/search"))
        .and(query_param("houseNumber", "A101"))
        .and(query_param("keyword", "2024-03"))
        .and(query_param("pageNum", "1"))
        .respond_with(ok(page(vec![fee(2, "A101")], 1, 1, 20, 1)))
        .expect(1)
        .mount(&app.server)
        .await;

    let session = app.api.session();
    let mut controller = ListController::new(app.api.fees(), 20, app.api.notifier().clone());
    controller.reload(&session).await.unwrap();

    controller.search(&session, "  2024-03 ").await.unwrap();
    assert_eq!(controller.keyword(), Some("2024-03"));
    assert_eq!(controller.records().len(), 1);

    controller.search(&session, "").await.unwrap();
    assert!(!controller.is_searching());
    assert_eq!(controller.records().len(), 2);
}

#[tokio::test]
async fn buildings_filter_locally() {
    let app = TestApp::build().await.unwrap();
    app.login_as(Role::Admin, None);

    Mock::given(method("GET"))
        .and(path("/api/building/admin/all"))
        .respond_with(ok(page(
            vec![
                building(1, "A", "Garden Court"),
                building(2, "B", "River View"),
                building(3, "C", "Garden Hill"),
            ],
            1,
            1,
            20,
            3,
        )))
        .expect(1)
        .mount(&app.server)
        .await;

    let session = app.api.session();
    let mut controller = ListController::new(app.api.buildings(), 20, app.api.notifier().clone());
    controller.reload(&session).await.unwrap();

    controller.search(&session, "garden").await.unwrap();
    let ids: Vec<_> = controller.records().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 3]);

    controller.search(&session, "").await.unwrap();
    assert_eq!(controller.records().len(), 3);
}

#[tokio::test]
async fn house_search_sends_keyword_as_house_number_too() {
    let app = TestApp::build().await.unwrap();
    app.login_as(Role::Admin, None);

    Mock::given(method("GET"))
        .and(path("/api/house/admin/all"))
        .respond_with(ok(page(vec![house(1, "A101"), house(2, "B201")], 1, 1, 20, 2)))
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/house/search"))
        .and(query_param("keyword", "A1"))
        .and(query_param("houseNumber", "A1"))
        .respond_with(ok(page(vec![house(1, "A101")], 1, 1, 20, 1)))
        .expect(1)
        .mount(&app.server)
        .await;

    let session = app.api.session();
    let mut controller = ListController::new(app.api.houses(), 20, app.api.notifier().clone());
    controller.reload(&session).await.unwrap();
    controller.search(&session, "A1").await.unwrap();

    assert_eq!(controller.records().len(), 1);
    assert_eq!(controller.records()[0].house_number, "A101");
}

#[tokio::test]
async fn approving_a_registration_reloads_the_list() {
    let mut app = TestApp::build().await.unwrap();
    app.login_as(Role::Admin, None);

    Mock::given(method("GET"))
        .and(path("/api/registration/admin/pending"))
        .respond_with(ok(vec![registration(1), registration(2)]))
        .up_to_n_times(1)
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/registration/admin/pending"))
        .respond_with(ok(vec![registration(2)]))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/registration/admin/approve/1"))
        .respond_with(ok(()))
        .expect(1)
        .mount(&app.server)
        .await;

    let session = app.api.session();
    let mut controller =
        ListController::new(app.api.registrations(), 20, app.api.notifier().clone());
    controller.reload(&session).await.unwrap();
    assert_eq!(controller.records().len(), 2);
    assert!(controller.is_last_page());

    let source = controller.source();
    controller
        .mutate(&session, "Registration approved", source.approve(&session, 1))
        .await
        .unwrap();

    let ids: Vec<_> = controller.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(app.notices(), vec!["Registration approved".to_string()]);
}

#[tokio::test]
async fn admin_users_are_refused_before_any_request() {
    let mut app = TestApp::build().await.unwrap();
    app.login_as(Role::Admin, None);

    Mock::given(method("DELETE"))
        .respond_with(ok(()))
        .expect(0)
        .mount(&app.server)
        .await;

    let admin = estate_common::api::UserResponse {
        id: 1,
        username: "root".into(),
        name: "Root".into(),
        house_number: None,
        phone: None,
        role: Role::Admin,
        status: 1,
        create_time: None,
    };
    let err = app
        .api
        .users()
        .delete(&app.api.session(), &admin)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(
        err.notice().as_deref(),
        Some(estate_client::gateway::ADMIN_UNDELETABLE)
    );
    assert!(app.notices().is_empty());
}

/// Serves `total` fees with ids 1..=total, paged by the request.
struct Pager {
    total: u64,
}

impl Respond for Pager {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let param = |key: &str| {
            request
                .url
                .query_pairs()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse::<u64>().ok())
                .unwrap_or(1)
        };
        let (page_num, size) = (param("pageNum"), param("pageSize"));
        let pages = self.total.div_ceil(size);
        let first = (page_num - 1) * size + 1;
        let last = (page_num * size).min(self.total);
        let records = (first..=last).map(|id| fee(id, "A101")).collect();
        ok(page(records, page_num, pages, size, self.total))
    }
}

#[quickcheck]
fn paging_only_ever_grows(total: u8, size: u8) -> TestResult {
    let total = u64::from(total % 60);
    let size = u64::from(size % 10) + 1;

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async move {
        let app = TestApp::build().await.unwrap();
        app.login_as(Role::Admin, None);
        Mock::given(method("GET"))
            .and(path("/api/fee/admin/all"))
            .respond_with(Pager { total })
            .mount(&app.server)
            .await;

        let session = app.api.session();
        let mut controller =
            ListController::new(app.api.fees(), size, app.api.notifier().clone());
        controller.reload(&session).await.unwrap();

        let mut seen = controller.records().len();
        let mut current = controller.current_page();
        while controller.more(&session, seen.saturating_sub(1)).await {
            let now = controller.records().len();
            if now < seen || controller.current_page() != current + 1 {
                return TestResult::failed();
            }
            seen = now;
            current += 1;
        }

        let ids: Vec<u64> = controller.records().iter().map(|f| f.id).collect();
        let expected: Vec<u64> = (1..=total).collect();
        TestResult::from_bool(controller.is_last_page() && ids == expected)
    })
}
