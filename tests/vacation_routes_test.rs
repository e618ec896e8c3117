mod common;

use actix_web::{http::StatusCode, test, web};
use serde_json::{json, Value};

use common::{beach_activity, create_app, flight_json, test_service, vacation_json, MockBooking};

#[actix_rt::test]
async fn test_create_and_fetch_vacation() {
    let data = web::Data::new(test_service(MockBooking::new()));
    let app = test::init_service(create_app(data)).await;

    let req = test::TestRequest::post()
        .uri("/api/vacations")
        .set_json(vacation_json(Some(flight_json()), vec![beach_activity()]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["state"], "not_started");
    let checklist = created["checklist"].as_array().unwrap();
    let kinds: Vec<&str> = checklist.iter().map(|i| i["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, ["home_to_airport", "travel", "activity", "airport_to_home"]);
    assert_eq!(checklist[2]["label"], "Beach: Snorkeling");
    assert_eq!(checklist[1]["ride_worthy"], false);

    let id = created["id"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/vacations/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["progress"]["current_leg_index"], 0);

    let req = test::TestRequest::get()
        .uri("/api/travelers/traveler-1/vacations")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_unknown_vacation_is_not_found() {
    let data = web::Data::new(test_service(MockBooking::new()));
    let app = test::init_service(create_app(data)).await;

    let req = test::TestRequest::get()
        .uri("/api/vacations/does-not-exist")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[actix_rt::test]
async fn test_out_of_range_coordinates_are_rejected() {
    let data = web::Data::new(test_service(MockBooking::new()));
    let app = test::init_service(create_app(data)).await;

    let mut body = vacation_json(None, vec![]);
    body["home"]["point"]["latitude"] = json!(123.0);

    let req = test::TestRequest::post()
        .uri("/api/vacations")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_leg_lifecycle_over_http() {
    let booking = MockBooking::new();
    let data = web::Data::new(test_service(booking.clone()));
    let app = test::init_service(create_app(data)).await;

    let req = test::TestRequest::post()
        .uri("/api/vacations")
        .set_json(vacation_json(None, vec![beach_activity()]))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    for leg in 0..3 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/vacations/{}/next-leg", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let next: Value = test::read_body_json(resp).await;
        assert_eq!(next["status"], "ride_requested");
        assert_eq!(next["intent"]["leg_index"], leg);

        let fare = next["quote"]["fare"].as_str().unwrap();
        assert_eq!(fare.split('.').nth(1).map(str::len), Some(2));

        // A second start while the ride is out is rejected
        let req = test::TestRequest::post()
            .uri(&format!("/api/vacations/{}/next-leg", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let ride_id = next["ride_id"].as_str().unwrap();
        let req = test::TestRequest::post()
            .uri(&format!("/api/vacations/{}/rides/{}/complete", id, ride_id))
            .to_request();
        let closed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(closed["status"], "advanced");
        assert_eq!(closed["progress"]["current_leg_index"], leg + 1);
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/vacations/{}/next-leg", id))
        .to_request();
    let done: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(done["status"], "completed");

    // Late duplicate completion is a benign no-op
    let req = test::TestRequest::post()
        .uri(&format!("/api/vacations/{}/rides/ride-3/complete", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "no_op");
    assert_eq!(body["reason"], "already_completed");

    let req = test::TestRequest::get()
        .uri("/api/travelers/traveler-1/loyalty")
        .to_request();
    let loyalty: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(loyalty["total_points"], 650);
    assert_eq!(loyalty["tier"], "bronze");
    assert!(loyalty["benefits"].as_str().is_some());

    assert_eq!(booking.intents().len(), 3);
}

#[actix_rt::test]
async fn test_booking_failure_over_http() {
    let booking = MockBooking::new();
    let data = web::Data::new(test_service(booking.clone()));
    let app = test::init_service(create_app(data)).await;

    let req = test::TestRequest::post()
        .uri("/api/vacations")
        .set_json(vacation_json(None, vec![]))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    booking.fail_next(1);
    let req = test::TestRequest::post()
        .uri(&format!("/api/vacations/{}/next-leg", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let req = test::TestRequest::post()
        .uri(&format!("/api/vacations/{}/next-leg", id))
        .to_request();
    let next: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(next["intent"]["leg_index"], 0);

    let ride_id = next["ride_id"].as_str().unwrap();
    let req = test::TestRequest::post()
        .uri(&format!("/api/vacations/{}/rides/{}/cancel", id, ride_id))
        .to_request();
    let released: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(released["status"], "released");
    assert_eq!(released["progress"]["has_active_ride"], false);
}

#[actix_rt::test]
async fn test_vacation_without_rides_over_http() {
    let booking = MockBooking::new();
    let data = web::Data::new(test_service(booking.clone()));
    let app = test::init_service(create_app(data)).await;

    let mut body = vacation_json(None, vec![]);
    body["ride_included"] = json!(false);
    body["passengers"] = json!(2);
    let req = test::TestRequest::post()
        .uri("/api/vacations")
        .set_json(body)
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["ride_included"], false);
    assert_eq!(created["passengers"], 2);
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/vacations/{}/next-leg", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["error"], "rides_not_included");
    assert!(booking.intents().is_empty());

    let mut body = vacation_json(None, vec![]);
    body["passengers"] = json!(0);
    let req = test::TestRequest::post()
        .uri("/api/vacations")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
