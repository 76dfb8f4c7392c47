//! Read-only JSON API over the cached dataset and scenario results.

pub mod error;
pub mod params;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use hvac_domain::{
    domain::Tariff,
    query::{DailyEnergy, EnergyOverview, MonthlyEnergy, PowerPoint, TemperaturePoint},
};
use serde::Serialize;

use crate::{cache::AnalyticsCache, report::ScenarioReport};
pub use error::ApiError;
pub use params::ViewParams;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<AnalyticsCache>,
    pub tariff: Tariff,
    pub scatter_max_points: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/scenarios", get(scenarios))
        .route("/api/energy/daily", get(daily_energy))
        .route("/api/energy/monthly", get(monthly_energy))
        .route("/api/energy/overview", get(energy_overview))
        .route("/api/operation/power", get(power_series))
        .route("/api/operation/temperature", get(temperature_scatter))
        .with_state(state)
}

fn count_request(route: &'static str) {
    metrics::counter!("http_requests_total", "route" => route).increment(1);
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    readings: usize,
    fingerprint: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    count_request("health");
    Json(HealthResponse {
        status: "ok",
        readings: state.cache.dataset().len(),
        fingerprint: state.cache.fingerprint().to_string(),
    })
}

async fn scenarios(State(state): State<AppState>) -> Result<Json<ScenarioReport>, ApiError> {
    count_request("scenarios");
    let set = state.cache.scenarios()?;
    Ok(Json(ScenarioReport::new(&set, &state.tariff)))
}

async fn daily_energy(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<Vec<DailyEnergy>>, ApiError> {
    count_request("energy_daily");
    let filter = params.filter()?;
    let selection = filter.select(state.cache.dataset())?;
    Ok(Json(selection.daily_energy(&state.tariff)))
}

async fn monthly_energy(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<Vec<MonthlyEnergy>>, ApiError> {
    count_request("energy_monthly");
    let filter = params.filter()?;
    let selection = filter.select(state.cache.dataset())?;
    Ok(Json(selection.monthly_energy(&state.tariff)))
}

async fn energy_overview(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<EnergyOverview>, ApiError> {
    count_request("energy_overview");
    let filter = params.filter()?;
    let selection = filter.select(state.cache.dataset())?;
    Ok(Json(selection.overview(&state.tariff)))
}

async fn power_series(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<Vec<PowerPoint>>, ApiError> {
    count_request("operation_power");
    let filter = params.filter()?;
    let (from, to) = params.zoom()?;
    let selection = filter.select(state.cache.dataset())?;
    Ok(Json(selection.power_series(from, to)?))
}

async fn temperature_scatter(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<Vec<TemperaturePoint>>, ApiError> {
    count_request("operation_temperature");
    let filter = params.filter()?;
    let selection = filter.select(state.cache.dataset())?;
    Ok(Json(selection.temperature_scatter(state.scatter_max_points)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::ScenarioSettings;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use hvac_domain::{domain::Reading, Column, ColumnSet, Dataset};
    use time::{macros::datetime, Duration};
    use tower::ServiceExt;

    fn state(columns: ColumnSet) -> AppState {
        let mut readings = Vec::new();
        // Friday 2022-06-03 then Saturday 2022-06-04, 07:00-18:55 every 5 minutes.
        for day in 0..2 {
            let start = datetime!(2022-06-03 07:00) + Duration::days(day);
            for i in 0..144 {
                let ts = start + Duration::minutes(5 * i);
                let business = day == 0 && (8..18).contains(&ts.hour());
                readings.push(
                    Reading::new(ts, 0.5)
                        .with_on_off(ts.hour() < 18)
                        .with_business_hours(business)
                        .with_weekend(day == 1)
                        .with_power(6.0, 5.5)
                        .with_outside_temp(22.0 + ts.hour() as f64 / 2.0),
                );
            }
        }
        let dataset = Dataset::new(readings, columns).unwrap();
        AppState {
            cache: Arc::new(AnalyticsCache::new(dataset, ScenarioSettings::default())),
            tariff: Tariff::new(0.80, "BRL"),
            scatter_max_points: 50,
        }
    }

    fn all_columns() -> ColumnSet {
        [
            Column::OnOff,
            Column::IsBusinessHours,
            Column::IsWeekend,
            Column::ActivePowerReal,
            Column::ActivePowerPred,
            Column::OutsideTemp,
        ]
        .into_iter()
        .fold(ColumnSet::base(), ColumnSet::with)
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_dataset() {
        let (status, body) = get_json(state(all_columns()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["readings"], 288);
        assert_eq!(body["fingerprint"].as_str().unwrap().len(), 64);

        let state = state(all_columns());
        let (_, again) = get_json(state.clone(), "/health").await;
        assert_eq!(again["fingerprint"], state.cache.fingerprint());
    }

    #[tokio::test]
    async fn scenarios_cover_full_dataset() {
        let (status, body) = get_json(state(all_columns()), "/api/scenarios").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currency"], "BRL");
        assert_eq!(body["early_shutoff"]["daily"].as_array().unwrap().len(), 2);

        // Last "on" reading each day is 17:55, so 12 readings of 0.5 kWh go per day.
        let early = body["early_shutoff"]["total_savings_kwh"].as_f64().unwrap();
        assert!((early - 12.0).abs() < 1e-9);

        // Business hours are only 08:00-17:55 on the Friday: 120 readings kept.
        let kept = body["business_hours_only"]["total_scenario_kwh"].as_f64().unwrap();
        assert!((kept - 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn daily_energy_honours_filters() {
        let (status, body) =
            get_json(state(all_columns()), "/api/energy/daily?weekend=weekdays&business=business").await;
        assert_eq!(status, StatusCode::OK);
        let days = body.as_array().unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0]["date"], "2022-06-03");
        assert!((days[0]["energy_kwh"].as_f64().unwrap() - 60.0).abs() < 1e-9);
        assert!((days[0]["cost"].as_f64().unwrap() - 48.0).abs() < 1e-9);
        assert_eq!(days[0]["avg_power_kw"], 6.0);
    }

    #[tokio::test]
    async fn monthly_and_overview() {
        let (status, body) = get_json(state(all_columns()), "/api/energy/monthly").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["year_month"], "2022-06");

        let (status, body) = get_json(state(all_columns()), "/api/energy/overview?start=2022-06-04").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"], 1);
        assert!((body["total_energy_kwh"].as_f64().unwrap() - 72.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_selection_is_not_found() {
        let (status, body) = get_json(state(all_columns()), "/api/energy/daily?start=2023-01-01").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "EmptySelection");
    }

    #[tokio::test]
    async fn bad_date_is_bad_request() {
        let (status, _) = get_json(state(all_columns()), "/api/energy/daily?end=tomorrow").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn power_series_zoom() {
        let (status, body) = get_json(
            state(all_columns()),
            "/api/operation/power?from=2022-06-03T07:00:00&to=2022-06-03T07:10:00",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["active_power_pred"], 5.5);
    }

    #[tokio::test]
    async fn temperature_scatter_is_capped() {
        let (status, body) = get_json(state(all_columns()), "/api/operation/temperature").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 50);
    }

    #[tokio::test]
    async fn missing_column_is_unprocessable() {
        let columns = ColumnSet::base()
            .with(Column::OnOff)
            .with(Column::IsBusinessHours)
            .with(Column::IsWeekend);
        let (status, body) = get_json(state(columns), "/api/operation/power").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "MissingColumn");
    }
}
