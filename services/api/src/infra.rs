use film_democracy::config::AppConfig;
use film_democracy::error::AppError;
use film_democracy::workflows::club::{ClubSnapshot, SharedSnapshot};
use film_democracy::workflows::notifications::NotificationService;
use film_democracy::workflows::ranking::RankingService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Services sharing one in-memory record store.
pub(crate) struct Workflows {
    pub(crate) ranking: Arc<RankingService<SharedSnapshot>>,
    pub(crate) notifications: Arc<NotificationService<SharedSnapshot>>,
}

impl Workflows {
    pub(crate) fn new(config: &AppConfig, store: SharedSnapshot) -> Self {
        let store = Arc::new(store);
        let ranking = RankingService::new(store.clone(), config.ranking.points_table)
            .with_default_max_duration(config.ranking.max_duration_minutes);
        let notifications = NotificationService::new(store, config.notifications.max_messages);

        Self {
            ranking: Arc::new(ranking),
            notifications: Arc::new(notifications),
        }
    }
}

pub(crate) fn load_snapshot(path: Option<&Path>) -> Result<SharedSnapshot, AppError> {
    let snapshot = match path {
        Some(path) => {
            let snapshot = ClubSnapshot::from_path(path)?;
            info!(
                path = %path.display(),
                clubs = snapshot.clubs.len(),
                films = snapshot.films.len(),
                votes = snapshot.votes.len(),
                notifications = snapshot.notifications.len(),
                "club snapshot loaded"
            );
            snapshot
        }
        None => ClubSnapshot::default(),
    };
    Ok(SharedSnapshot::new(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use film_democracy::workflows::club::{ClubId, ClubRecords};

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/club_snapshot.json");

    #[test]
    fn loads_the_sample_snapshot() {
        let store = load_snapshot(Some(Path::new(FIXTURE))).expect("fixture loads");
        let club = store
            .club(&ClubId("00042".to_string()))
            .expect("club present");
        assert_eq!(club.name, "Cine Forum");
    }

    #[test]
    fn missing_snapshot_path_is_an_error() {
        let result = load_snapshot(Some(Path::new("/nonexistent/snapshot.json")));
        assert!(matches!(result, Err(AppError::Snapshot(_))));
    }

    #[test]
    fn starts_empty_without_snapshot() {
        let store = load_snapshot(None).expect("empty store");
        assert!(store.snapshot().clubs.is_empty());
    }
}
