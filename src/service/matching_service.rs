// service/matching_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, jobdb::JobExt},
    models::{jobmodel::Job, usermodel::User},
    service::{
        error::ServiceError,
        notification_service::{best_effort, NotificationService},
    },
    utils::geo::haversine_km,
};

/// One feed entry: a searching job and, when both sides have coordinates,
/// its distance from the worker.
#[derive(Debug)]
pub struct ScoredJob {
    pub job: Job,
    pub distance_km: Option<f64>,
}

/// The matching feed and the acceptance write. Matching is a row filter
/// (searching, unassigned, skill categories) plus a proximity sort; the
/// conditional UPDATE in `accept_job` is the only synchronization
/// primitive guarding the accept race.
#[derive(Debug, Clone)]
pub struct MatchingService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl MatchingService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Snapshot read of jobs this worker could accept. Realtime layers
    /// re-issue this on change events rather than trusting push payloads.
    pub async fn list_available(
        &self,
        worker: &User,
        worker_lat: Option<f64>,
        worker_lng: Option<f64>,
    ) -> Result<Vec<ScoredJob>, ServiceError> {
        if !worker.can_take_jobs() {
            return Err(ServiceError::WorkerNotEligible(worker.id));
        }

        let jobs = self
            .db_client
            .get_available_jobs(worker.skills.as_deref())
            .await?;

        Ok(rank_by_proximity(jobs, worker_lat, worker_lng))
    }

    /// First-writer-wins acceptance. Zero affected rows means another
    /// worker got the job; that is a domain error, never silent success.
    pub async fn accept_job(&self, job_id: Uuid, worker: &User) -> Result<Job, ServiceError> {
        if !worker.can_take_jobs() {
            return Err(ServiceError::WorkerNotEligible(worker.id));
        }

        match self.db_client.accept_job(job_id, worker.id).await? {
            Some(job) => {
                debug_assert!(job.assignment_consistent());
                tracing::info!(job_id = %job_id, worker_id = %worker.id, "job accepted");
                best_effort(
                    self.notification_service
                        .notify_job_accepted(&job, &worker.name)
                        .await,
                    "job accepted",
                );
                Ok(job)
            }
            None => {
                // Distinguish a lost race from a job that never existed.
                match self.db_client.get_job_by_id(job_id).await? {
                    Some(_) => Err(ServiceError::AlreadyAccepted(job_id)),
                    None => Err(ServiceError::JobNotFound(job_id)),
                }
            }
        }
    }
}

/// Sort jobs by great-circle distance from the worker, closest first.
/// Jobs without coordinates (or when the worker sent none) sort after all
/// located jobs, keeping their original relative order.
pub fn rank_by_proximity(
    jobs: Vec<Job>,
    worker_lat: Option<f64>,
    worker_lng: Option<f64>,
) -> Vec<ScoredJob> {
    let mut scored: Vec<ScoredJob> = jobs
        .into_iter()
        .map(|job| {
            let distance_km = match (worker_lat, worker_lng, job.location_lat, job.location_lng) {
                (Some(wlat), Some(wlng), Some(jlat), Some(jlng)) => {
                    Some(haversine_km(wlat, wlng, jlat, jlng))
                }
                _ => None,
            };
            ScoredJob { job, distance_km }
        })
        .collect();

    // Stable: the None tail keeps its incoming order.
    scored.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::jobmodel::JobStatus;

    fn job_at(lat: Option<f64>, lng: Option<f64>, tag: &str) -> Job {
        Job {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            worker_id: None,
            category_id: Uuid::new_v4(),
            description: tag.to_string(),
            images: None,
            location_address: "test address".to_string(),
            location_lat: lat,
            location_lng: lng,
            status: JobStatus::Searching,
            scheduled_time: None,
            amount: None,
            otp: "0000".to_string(),
            dispute_reason: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn closer_jobs_sort_first() {
        // Worker in central Bengaluru; far job is in Delhi.
        let far = job_at(Some(28.70), Some(77.10), "far");
        let near = job_at(Some(12.98), Some(77.60), "near");

        let ranked = rank_by_proximity(vec![far, near], Some(12.97), Some(77.59));

        assert_eq!(ranked[0].job.description, "near");
        assert_eq!(ranked[1].job.description, "far");
        assert!(ranked[0].distance_km.unwrap() < ranked[1].distance_km.unwrap());
    }

    #[test]
    fn jobs_without_coordinates_sort_last_in_original_order() {
        let a = job_at(None, None, "a");
        let b = job_at(Some(12.98), Some(77.60), "b");
        let c = job_at(None, None, "c");

        let ranked = rank_by_proximity(vec![a, b, c], Some(12.97), Some(77.59));

        assert_eq!(ranked[0].job.description, "b");
        assert_eq!(ranked[1].job.description, "a");
        assert_eq!(ranked[2].job.description, "c");
        assert!(ranked[1].distance_km.is_none());
    }

    #[test]
    fn no_worker_location_means_no_reordering() {
        let a = job_at(Some(12.98), Some(77.60), "a");
        let b = job_at(Some(28.70), Some(77.10), "b");

        let ranked = rank_by_proximity(vec![a, b], None, None);

        assert_eq!(ranked[0].job.description, "a");
        assert_eq!(ranked[1].job.description, "b");
        assert!(ranked.iter().all(|s| s.distance_km.is_none()));
    }
}
