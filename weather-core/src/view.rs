//! Page-level operations: render the dashboard, add a city, delete a city.
//!
//! Nothing here keeps state between calls. Each render returns a fresh
//! [`Dashboard`] value.

use crate::{
    model::{City, Dashboard, WeatherSnapshot},
    provider::WeatherProvider,
    store::{CityStore, StoreError},
};

pub const UNKNOWN_CITY_WARNING: &str = "The city doesn't exist!";
pub const DUPLICATE_CITY_WARNING: &str = "The city has already been added to the list!";
pub const MISSING_NAME_WARNING: &str = "Please enter a city name!";

/// Outcome of an add-city submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddCity {
    Added(City),
    /// The store was not touched; the message is meant for the user.
    Rejected(&'static str),
}

/// List every stored city and fetch its current weather, one city at a time.
///
/// A failed fetch marks that city stale and adds a warning; the remaining
/// cities are still rendered. Only a storage failure aborts the render.
pub async fn render(
    store: &dyn CityStore,
    provider: &dyn WeatherProvider,
) -> Result<Dashboard, StoreError> {
    let cities = store.list()?;
    Ok(render_cities(cities, provider).await)
}

/// Fetch and classify an already-listed set of cities.
pub async fn render_cities(cities: Vec<City>, provider: &dyn WeatherProvider) -> Dashboard {
    let mut dashboard = Dashboard::default();

    for city in cities {
        match provider.fetch(&city.name).await {
            Ok(info) => {
                let snapshot = WeatherSnapshot::from_info(&city, &info);
                tracing::debug!(
                    city = %city.name,
                    period = %snapshot.day_period,
                    "weather snapshot ready"
                );
                dashboard.weather.insert(city.name.clone(), snapshot);
            }
            Err(err) => {
                tracing::warn!(city = %city.name, error = %err, "weather fetch failed");
                dashboard.warnings.push(UNKNOWN_CITY_WARNING.to_string());
                dashboard.stale.push(city);
            }
        }
    }

    dashboard
}

/// Validate and store a submitted city name.
pub fn add_city(store: &dyn CityStore, name: Option<&str>) -> Result<AddCity, StoreError> {
    let Some(name) = name else {
        tracing::warn!("add-city submission without a name");
        return Ok(AddCity::Rejected(MISSING_NAME_WARNING));
    };

    match store.add(name) {
        Ok(city) => {
            tracing::info!(id = city.id, city = %city.name, "city added");
            Ok(AddCity::Added(city))
        }
        Err(StoreError::MissingName) => {
            tracing::warn!("add-city submission with a blank name");
            Ok(AddCity::Rejected(MISSING_NAME_WARNING))
        }
        Err(StoreError::DuplicateCity(name)) => {
            tracing::warn!(city = %name, "city already tracked");
            Ok(AddCity::Rejected(DUPLICATE_CITY_WARNING))
        }
        Err(err) => Err(err),
    }
}

/// Remove a city. Unknown ids are treated as already removed.
pub fn delete_city(store: &dyn CityStore, id: i64) -> Result<(), StoreError> {
    if store.remove(id)? {
        tracing::info!(id, "city removed");
    } else {
        tracing::debug!(id, "delete requested for unknown city");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::WeatherInfo, period::DayPeriod, provider::FetchError, store::SqliteCityStore,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Answers from a fixed table; unknown names fail like a 404.
    #[derive(Debug, Default)]
    struct StubProvider {
        known: HashMap<String, WeatherInfo>,
    }

    impl StubProvider {
        fn with(mut self, city: &str, info: WeatherInfo) -> Self {
            self.known.insert(city.to_string(), info);
            self
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch(&self, city: &str) -> Result<WeatherInfo, FetchError> {
            self.known.get(city).cloned().ok_or_else(|| FetchError::UnknownCity(city.to_string()))
        }
    }

    fn clear_midday() -> WeatherInfo {
        WeatherInfo {
            temperature: 20.0,
            condition: "Clear".into(),
            sunrise: 0,
            sunset: 10_000,
            observed_at: 5_000,
        }
    }

    fn store() -> SqliteCityStore {
        SqliteCityStore::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn add_then_render_paris() {
        let store = store();
        let provider = StubProvider::default().with("Paris", clear_midday());

        let added = add_city(&store, Some("Paris")).unwrap();
        let AddCity::Added(paris) = added else { panic!("expected the city to be added") };
        assert_eq!(store.list().unwrap(), vec![paris.clone()]);

        let dashboard = render(&store, &provider).await.unwrap();

        assert_eq!(dashboard.weather.len(), 1);
        let snap = &dashboard.weather["Paris"];
        assert_eq!(snap.city_id, paris.id);
        assert_eq!(snap.temperature, 20.0);
        assert_eq!(snap.condition, "Clear");
        assert_eq!(snap.day_period, DayPeriod::Day);
        assert!(dashboard.warnings.is_empty());
        assert!(dashboard.stale.is_empty());
    }

    #[tokio::test]
    async fn one_failed_fetch_does_not_hide_others() {
        let store = store();
        store.add("Atlantis").unwrap();
        store.add("Paris").unwrap();
        let provider = StubProvider::default().with("Paris", clear_midday());

        let dashboard = render(&store, &provider).await.unwrap();

        assert!(dashboard.weather.contains_key("Paris"));
        assert!(!dashboard.weather.contains_key("Atlantis"));
        assert_eq!(dashboard.stale.len(), 1);
        assert_eq!(dashboard.stale[0].name, "Atlantis");
        assert_eq!(dashboard.warnings, vec![UNKNOWN_CITY_WARNING.to_string()]);
        // Flagging does not delete.
        assert_eq!(store.list().unwrap().len(), 2);
    }

    /// Fails every lookup with a server error.
    #[derive(Debug)]
    struct BrokenProvider;

    #[async_trait]
    impl WeatherProvider for BrokenProvider {
        async fn fetch(&self, city: &str) -> Result<WeatherInfo, FetchError> {
            if city == "Paris" {
                return Ok(clear_midday());
            }
            Err(FetchError::Status { status: 500, body: "internal error".into() })
        }
    }

    #[tokio::test]
    async fn provider_server_error_flags_city_stale() {
        let store = store();
        store.add("Oslo").unwrap();
        store.add("Paris").unwrap();
        store.add("Lima").unwrap();

        let dashboard = render(&store, &BrokenProvider).await.unwrap();

        assert_eq!(dashboard.weather.keys().collect::<Vec<_>>(), vec!["Paris"]);
        let stale: Vec<_> = dashboard.stale.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(stale, vec!["Oslo", "Lima"]);
        assert_eq!(dashboard.warnings.len(), 2);
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn render_cities_without_store() {
        let cities = vec![City { id: 5, name: "Paris".into() }];
        let provider = StubProvider::default().with("Paris", clear_midday());

        let dashboard = render_cities(cities, &provider).await;

        assert_eq!(dashboard.weather["Paris"].city_id, 5);
    }

    #[tokio::test]
    async fn render_empty_store() {
        let dashboard = render(&store(), &StubProvider::default()).await.unwrap();
        assert_eq!(dashboard, Dashboard::default());
    }

    #[test]
    fn duplicate_add_is_rejected_without_change() {
        let store = store();
        add_city(&store, Some("Paris")).unwrap();
        let before = store.list().unwrap();

        let outcome = add_city(&store, Some("Paris")).unwrap();

        assert_eq!(outcome, AddCity::Rejected(DUPLICATE_CITY_WARNING));
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn missing_or_blank_name_is_rejected() {
        let store = store();
        assert_eq!(add_city(&store, None).unwrap(), AddCity::Rejected(MISSING_NAME_WARNING));
        assert_eq!(add_city(&store, Some(" ")).unwrap(), AddCity::Rejected(MISSING_NAME_WARNING));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn delete_unknown_id_is_idempotent() {
        let store = store();
        store.add("Paris").unwrap();
        let before = store.list().unwrap();

        delete_city(&store, 42).unwrap();
        delete_city(&store, 42).unwrap();

        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn delete_removes_city() {
        let store = store();
        let paris = store.add("Paris").unwrap();

        delete_city(&store, paris.id).unwrap();

        assert!(store.list().unwrap().is_empty());
    }
}
