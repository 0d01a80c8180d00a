//! Acting-user session: owns the active profile store, its live
//! subscription and the latest published `AnalysisView`.
//!
//! Every pass takes a fresh token. A finished pass is committed (cache write
//! plus publish) only if its token is still the latest, so an older pass can
//! never overwrite state produced for a newer snapshot. Switching users aborts
//! the subscription task and every in-flight pass before anything for the new
//! user is set up.

pub mod handlers;
pub mod pipeline;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::{AbortHandle, JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::models::profile::{Goal, ProfilePatch, UserProfile};
use crate::models::recommendation::RecommendationItem;
use crate::recommendations::cache::cache_key;
use crate::recommendations::mutator::complete_recommendation;
use crate::store::{ProfileStore, ProfileSubscription, StoreError};

pub use pipeline::{AnalysisView, ItemSource, Pipeline};
use pipeline::Pass;

/// Document id used against the local store when nobody is signed in.
const GUEST_UID: &str = "guest";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("the acting user changed before the request finished")]
    UserChanged,

    #[error("analysis pass failed: {0}")]
    Pass(JoinError),
}

/// Outcome of `Session::complete`.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Done(AnalysisView),
    NotFound,
    Failed,
    UserChanged,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub uid: Option<String>,
    pub backend: &'static str,
}

struct ActiveUser {
    uid: Option<String>,
    store: Arc<dyn ProfileStore>,
    listener: Option<JoinHandle<()>>,
    /// On-demand passes started by `refresh`.
    passes: Vec<AbortHandle>,
}

impl ActiveUser {
    fn doc_id(&self) -> &str {
        self.uid.as_deref().unwrap_or(GUEST_UID)
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            uid: self.uid.clone(),
            backend: self.store.backend(),
        }
    }

    fn abort_passes(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
        for pass in self.passes.drain(..) {
            pass.abort();
        }
    }
}

/// What became of a finished pass.
enum Commit {
    Published(AnalysisView),
    Stale(AnalysisView),
}

/// Token counter plus the published view. Commits are serialized, and the
/// final token check happens under the watch channel's lock, so a stale pass
/// can never land after a newer one or after a user switch.
#[derive(Clone)]
struct Publisher {
    token: Arc<AtomicU64>,
    view: Arc<watch::Sender<Option<AnalysisView>>>,
    commits: Arc<Mutex<()>>,
}

impl Publisher {
    fn new() -> Self {
        let (view, _) = watch::channel(None);
        Self {
            token: Arc::new(AtomicU64::new(0)),
            view: Arc::new(view),
            commits: Arc::new(Mutex::new(())),
        }
    }

    fn next_token(&self) -> u64 {
        self.token.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.token.load(Ordering::SeqCst) == token
    }

    fn publish(&self, token: u64, view: AnalysisView) -> bool {
        self.view.send_if_modified(|current| {
            if !self.is_current(token) {
                return false;
            }
            *current = Some(view);
            true
        })
    }

    /// Writes the pass's cache entry and publishes its view, but only while
    /// `token` is the latest one handed out.
    async fn commit(&self, token: u64, pass: Pass, pipeline: &Pipeline) -> Commit {
        let _serial = self.commits.lock().await;
        if !self.is_current(token) {
            debug!("Dropped stale analysis pass {token}");
            return Commit::Stale(pass.view);
        }
        pipeline.persist(&pass).await;
        let view = pass.view;
        if self.publish(token, view.clone()) {
            Commit::Published(view)
        } else {
            Commit::Stale(view)
        }
    }

    fn clear(&self) {
        self.next_token();
        self.view.send_replace(None);
    }
}

type PassHandle = JoinHandle<Result<Commit, StoreError>>;

pub struct Session {
    local: Arc<dyn ProfileStore>,
    remote: Option<Arc<dyn ProfileStore>>,
    pipeline: Pipeline,
    publisher: Publisher,
    active: Mutex<ActiveUser>,
}

impl Session {
    /// A session acting as guest. Call `switch_user` to start listening.
    pub fn new(
        local: Arc<dyn ProfileStore>,
        remote: Option<Arc<dyn ProfileStore>>,
        pipeline: Pipeline,
    ) -> Self {
        let active = ActiveUser {
            uid: None,
            store: Arc::clone(&local),
            listener: None,
            passes: Vec::new(),
        };
        Self {
            local,
            remote,
            pipeline,
            publisher: Publisher::new(),
            active: Mutex::new(active),
        }
    }

    fn store_for(&self, uid: Option<&str>) -> Arc<dyn ProfileStore> {
        match (uid, &self.remote) {
            (Some(_), Some(remote)) => Arc::clone(remote),
            _ => Arc::clone(&self.local),
        }
    }

    /// Changes the acting identity. Previous subscription and in-flight
    /// passes are torn down first and the published view is cleared.
    pub async fn switch_user(&self, uid: Option<String>) -> Result<SessionInfo, StoreError> {
        let uid = uid.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        let mut active = self.active.lock().await;

        active.abort_passes();
        self.publisher.clear();

        active.store = self.store_for(uid.as_deref());
        active.uid = uid;

        let subscription = active.store.subscribe(active.doc_id()).await?;
        active.listener = Some(tokio::spawn(listen(
            subscription,
            active.uid.clone(),
            self.pipeline.clone(),
            self.publisher.clone(),
        )));

        let info = active.info();
        info!(
            "Session now acting as {} on the {} store",
            info.uid.as_deref().unwrap_or(GUEST_UID),
            info.backend
        );
        Ok(info)
    }

    pub async fn current_user(&self) -> SessionInfo {
        self.active.lock().await.info()
    }

    pub fn current_view(&self) -> Option<AnalysisView> {
        self.publisher.view.borrow().clone()
    }

    #[cfg(test)]
    fn watch(&self) -> watch::Receiver<Option<AnalysisView>> {
        self.publisher.view.subscribe()
    }

    pub async fn profile(&self) -> Result<Option<UserProfile>, StoreError> {
        let (store, uid) = self.active_store().await;
        store.get(uid.as_deref().unwrap_or(GUEST_UID)).await
    }

    /// Runs a pass on the stored profile right now and publishes it.
    pub async fn refresh(&self) -> Result<AnalysisView, SessionError> {
        let uid = self.active.lock().await.uid.clone();
        self.refresh_as(&uid).await
    }

    /// Like `refresh`, but fails with `UserChanged` unless `uid` is still
    /// acting. The session lock is only held while the pass is spawned.
    async fn refresh_as(&self, uid: &Option<String>) -> Result<AnalysisView, SessionError> {
        let handle = {
            let mut active = self.active.lock().await;
            if active.uid != *uid {
                return Err(SessionError::UserChanged);
            }
            self.spawn_pass(&mut active)
        };

        match handle.await {
            Ok(Ok(Commit::Published(view))) => Ok(view),
            Ok(Ok(Commit::Stale(view))) => {
                // a newer pass won; answer with it while the user is unchanged
                if self.active.lock().await.uid != *uid {
                    return Err(SessionError::UserChanged);
                }
                Ok(self
                    .current_view()
                    .filter(|current| current.uid == *uid)
                    .unwrap_or(view))
            }
            Ok(Err(e)) => Err(e.into()),
            Err(e) if e.is_cancelled() => Err(SessionError::UserChanged),
            Err(e) => Err(SessionError::Pass(e)),
        }
    }

    fn spawn_pass(&self, active: &mut ActiveUser) -> PassHandle {
        active.passes.retain(|pass| !pass.is_finished());

        let token = self.publisher.next_token();
        let store = Arc::clone(&active.store);
        let uid = active.uid.clone();
        let pipeline = self.pipeline.clone();
        let publisher = self.publisher.clone();

        let handle = tokio::spawn(async move {
            let profile = store.get(uid.as_deref().unwrap_or(GUEST_UID)).await?;
            let pass = pipeline.analyze(uid.as_deref(), profile.as_ref()).await;
            Ok::<_, StoreError>(publisher.commit(token, pass, &pipeline).await)
        });
        active.passes.push(handle.abort_handle());
        handle
    }

    /// The published view, or a fresh pass if none is published yet.
    pub async fn view(&self) -> Result<AnalysisView, SessionError> {
        match self.current_view() {
            Some(view) => Ok(view),
            None => self.refresh().await,
        }
    }

    pub async fn save_goal(&self, goal: Goal) -> Result<AnalysisView, SessionError> {
        self.save_profile(ProfilePatch::goal(goal)).await
    }

    pub async fn save_profile(&self, patch: ProfilePatch) -> Result<AnalysisView, SessionError> {
        let (store, uid) = self.active_store().await;
        let doc_id = uid.as_deref().unwrap_or(GUEST_UID);
        if let Err(e) = store.set_or_merge(doc_id, patch).await {
            error!("Saving profile of {doc_id} failed: {e}");
            return Err(e.into());
        }
        self.refresh_as(&uid).await
    }

    /// Marks the recommendation titled `title` complete for the acting user.
    pub async fn complete(&self, title: &str) -> Completion {
        let view = match self.view().await {
            Ok(view) => view,
            Err(SessionError::UserChanged) => return Completion::UserChanged,
            Err(e) => {
                error!("Loading the roadmap to complete {title} failed: {e}");
                return Completion::Failed;
            }
        };
        self.complete_from(&view, title).await
    }

    /// Completes `title` out of `view`. Nothing is written unless the view
    /// belongs to the user acting at the moment the store is picked.
    async fn complete_from(&self, view: &AnalysisView, title: &str) -> Completion {
        let Some(item) = view.find_item(title) else {
            return Completion::NotFound;
        };

        let store = {
            let active = self.active.lock().await;
            if active.uid != view.uid {
                warn!("Not completing {title}: it was recommended to another user");
                return Completion::UserChanged;
            }
            Arc::clone(&active.store)
        };
        let uid = &view.uid;
        let doc_id = uid.as_deref().unwrap_or(GUEST_UID);
        let skill = completion_skill(item);

        if !complete_recommendation(store.as_ref(), doc_id, &skill, item.kind).await {
            return Completion::Failed;
        }

        let key = cache_key(uid.as_deref());
        if let Err(e) = self.pipeline.cache.remove_item(&key, &item.title).await {
            error!("Pruning {} from {key} failed: {e}", item.title);
        }
        if let Err(e) = self.pipeline.blocklist.append(&item.title).await {
            error!("Blocklisting {} failed: {e}", item.title);
        }

        match self.refresh_as(uid).await {
            Ok(after) => Completion::Done(after),
            Err(SessionError::UserChanged) => Completion::UserChanged,
            Err(e) => {
                warn!("Refresh after completing {} failed: {e}", item.title);
                Completion::Failed
            }
        }
    }

    async fn active_store(&self) -> (Arc<dyn ProfileStore>, Option<String>) {
        let active = self.active.lock().await;
        (Arc::clone(&active.store), active.uid.clone())
    }
}

/// Skill credited when `item` is completed.
fn completion_skill(item: &RecommendationItem) -> String {
    item.related_skill
        .as_deref()
        .or(item.purpose.as_deref())
        .or_else(|| item.tags.first().map(String::as_str))
        .unwrap_or(&item.title)
        .to_string()
}

/// Drives the pipeline from a subscription. Only the newest snapshot's pass
/// is kept running: a new snapshot aborts the one before it, and aborting
/// this task aborts whatever is still in flight.
async fn listen(
    mut subscription: ProfileSubscription,
    uid: Option<String>,
    pipeline: Pipeline,
    publisher: Publisher,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            snapshot = subscription.next() => {
                let Some(snapshot) = snapshot else {
                    debug!("Profile subscription ended");
                    break;
                };
                in_flight.abort_all();
                let token = publisher.next_token();
                let pipeline = pipeline.clone();
                let publisher = publisher.clone();
                let uid = uid.clone();
                in_flight.spawn(async move {
                    let pass = pipeline.analyze(uid.as_deref(), snapshot.as_ref()).await;
                    publisher.commit(token, pass, &pipeline).await;
                });
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    if !e.is_cancelled() {
                        error!("Analysis pass panicked: {e}");
                    }
                }
            }
        }
    }

    while in_flight.join_next().await.is_some() {}
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::assessment::catalog::RoleCatalog;
    use crate::models::profile::{Domain, SkillSet, UserSkill};
    use crate::models::recommendation::ItemKind;
    use crate::recommendations::cache::{BlocklistStore, RecommendationCache};
    use crate::recommendations::generator::{
        RawRecommendations, RecommendationGenerator, RecommendationSource, RecommenderError,
    };
    use crate::store::kv::{KeyValueStore, MemoryKeyValueStore};
    use crate::store::local::LocalProfileStore;

    struct Fixture {
        kv: Arc<MemoryKeyValueStore>,
        session: Session,
    }

    fn fixture(remote: Option<Arc<dyn ProfileStore>>) -> Fixture {
        fixture_with(remote, None)
    }

    fn fixture_with(
        remote: Option<Arc<dyn ProfileStore>>,
        external: Option<Arc<dyn RecommendationSource>>,
    ) -> Fixture {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let pipeline = Pipeline::new(
            Arc::new(RoleCatalog::builtin()),
            RecommendationGenerator::new(external),
            RecommendationCache::new(kv.clone()),
            BlocklistStore::new(kv.clone()),
        );
        let local = Arc::new(LocalProfileStore::new(kv.clone()));
        Fixture {
            kv,
            session: Session::new(local, remote, pipeline),
        }
    }

    /// Answers slowly for one role. Every call returns a differently
    /// numbered project, so two calls never agree on their items.
    struct DelayedSource {
        slow_role: &'static str,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl DelayedSource {
        fn new(slow_role: &'static str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                slow_role,
                delay,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecommendationSource for DelayedSource {
        async fn recommend(
            &self,
            role: &str,
            _weak: &[String],
            missing: &[String],
        ) -> Result<RawRecommendations, RecommenderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if role == self.slow_role {
                tokio::time::sleep(self.delay).await;
            }
            let tag = missing.first().cloned().unwrap_or_else(|| role.to_string());
            Ok(RawRecommendations {
                items: vec![
                    RecommendationItem::new(ItemKind::Project, format!("{role} {n}"), "Lab")
                        .with_tags([tag]),
                ],
                explanation: format!("{role} plan"),
            })
        }

        fn name(&self) -> &'static str {
            "delayed"
        }
    }

    fn health_goal(title: &str) -> Goal {
        Goal {
            domain: Some(Domain::Health),
            specialization: Some(title.to_string()),
        }
    }

    fn agri_goal() -> Goal {
        Goal {
            domain: Some(Domain::Agri),
            specialization: None,
        }
    }

    async fn wait_for<F>(session: &Session, mut pred: F) -> AnalysisView
    where
        F: FnMut(&AnalysisView) -> bool,
    {
        let mut rx = session.watch();
        let found = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Some(view) = rx.borrow_and_update().clone() {
                    if pred(&view) {
                        return view;
                    }
                }
                if rx.changed().await.is_err() {
                    panic!("view channel closed");
                }
            }
        })
        .await;
        found.expect("view never matched")
    }

    #[tokio::test]
    async fn test_switch_user_publishes_initial_view() {
        let f = fixture(None);
        let info = f.session.switch_user(None).await.unwrap();
        assert_eq!(info.uid, None);
        assert_eq!(info.backend, "local");

        let view = wait_for(&f.session, |_| true).await;
        assert_eq!(view.role_title, "Healthcare Technology");
    }

    #[tokio::test]
    async fn test_save_goal_reruns_pipeline() {
        let f = fixture(None);
        f.session.switch_user(None).await.unwrap();

        let view = f.session.save_goal(agri_goal()).await.unwrap();
        assert_eq!(view.role_title, "Agricultural Technology");

        let pushed = wait_for(&f.session, |v| v.role_title == "Agricultural Technology").await;
        assert_eq!(pushed.gap, view.gap);
    }

    #[tokio::test]
    async fn test_view_refreshes_when_nothing_published() {
        let f = fixture(None);
        assert!(f.session.current_view().is_none());
        let view = f.session.view().await.unwrap();
        assert_eq!(view.uid, None);
        assert!(f.session.current_view().is_some());
    }

    #[tokio::test]
    async fn test_switch_user_clears_view() {
        let f = fixture(None);
        f.session.refresh().await.unwrap();
        assert!(f.session.current_view().is_some());

        let info = f.session.switch_user(Some("u1".to_string())).await.unwrap();
        assert_eq!(info.uid.as_deref(), Some("u1"));
        // No remote store configured: signed-in users fall back to local.
        assert_eq!(info.backend, "local");

        let view = wait_for(&f.session, |v| v.uid.as_deref() == Some("u1")).await;
        assert_eq!(view.uid.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_signed_in_user_uses_remote_store() {
        let remote_kv = Arc::new(MemoryKeyValueStore::new());
        let remote: Arc<dyn ProfileStore> = Arc::new(LocalProfileStore::new(remote_kv.clone()));
        let f = fixture(Some(remote));

        f.session.switch_user(Some("u1".to_string())).await.unwrap();
        f.session.save_goal(agri_goal()).await.unwrap();

        assert!(remote_kv.get("userGoal").await.unwrap().is_some());
        assert!(f.kv.get("userGoal").await.unwrap().is_none());

        f.session.switch_user(None).await.unwrap();
        let guest = f.session.view().await.unwrap();
        assert_eq!(guest.role_title, "Healthcare Technology");
    }

    #[tokio::test]
    async fn test_stale_token_is_not_published() {
        let publisher = Publisher::new();
        let sample = fixture(None).session.refresh().await.unwrap();

        let older = publisher.next_token();
        let newer = publisher.next_token();
        assert!(publisher.publish(newer, sample.clone()));
        assert!(!publisher.publish(older, sample.clone()));

        publisher.clear();
        assert!(publisher.view.borrow().is_none());
        assert!(!publisher.publish(newer, sample));
    }

    #[tokio::test]
    async fn test_stale_pass_does_not_write_cache() {
        let f = fixture(None);
        let publisher = Publisher::new();
        let profile = UserProfile {
            goal: Some(agri_goal()),
            ..UserProfile::default()
        };

        let older = publisher.next_token();
        let pass = f.session.pipeline.analyze(None, Some(&profile)).await;
        publisher.next_token();

        assert!(matches!(
            publisher.commit(older, pass, &f.session.pipeline).await,
            Commit::Stale(_)
        ));
        assert!(f.kv.get(&cache_key(None)).await.unwrap().is_none());
        assert!(publisher.view.borrow().is_none());
    }

    #[tokio::test]
    async fn test_late_pass_for_old_goal_leaves_newer_cache_alone() {
        let source = DelayedSource::new("Cardiology", Duration::from_millis(300));
        let f = Arc::new(fixture_with(None, Some(source.clone())));
        f.session.switch_user(None).await.unwrap();
        wait_for(&f.session, |_| true).await;

        let slow = {
            let f = Arc::clone(&f);
            tokio::spawn(async move { f.session.save_goal(health_goal("Cardiology")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        f.session.save_goal(health_goal("Neurology")).await.unwrap();
        let _ = slow.await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let published = f.session.current_view().unwrap();
        assert_eq!(published.role_title, "Neurology");
        let slot = f.kv.get(&cache_key(None)).await.unwrap().unwrap();
        assert!(slot.contains("Neurology"));
        assert!(!slot.contains("Cardiology"));

        let calls = source.calls();
        let again = f.session.refresh().await.unwrap();
        assert_eq!(again.source, ItemSource::Cache);
        assert_eq!(
            serde_json::to_string(&again.items).unwrap(),
            serde_json::to_string(&published.items).unwrap()
        );
        assert_eq!(source.calls(), calls);
    }

    #[tokio::test]
    async fn test_switch_user_does_not_wait_for_running_refresh() {
        let source = DelayedSource::new("Healthcare Technology", Duration::from_secs(2));
        let f = Arc::new(fixture_with(None, Some(source)));

        let pending = {
            let f = Arc::clone(&f);
            tokio::spawn(async move { f.session.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let switched = tokio::time::timeout(
            Duration::from_millis(500),
            f.session.switch_user(Some("u2".to_string())),
        )
        .await;
        assert!(switched.is_ok(), "switch_user queued behind the guest pass");

        let outcome = pending.await.unwrap();
        assert!(matches!(outcome, Err(SessionError::UserChanged)));
        assert!(f.session.current_view().is_none());
    }

    #[tokio::test]
    async fn test_complete_updates_profile_cache_and_blocklist() {
        let f = fixture(None);
        f.session.switch_user(None).await.unwrap();
        let view = f.session.save_goal(agri_goal()).await.unwrap();

        let item = view
            .items
            .iter()
            .find(|i| i.kind == ItemKind::Course)
            .cloned()
            .unwrap();
        let skill = item.related_skill.clone().unwrap();

        let Completion::Done(after) = f.session.complete(&item.title).await else {
            panic!("completion failed");
        };
        assert!(after.find_item(&item.title).is_none());

        let profile = f.session.profile().await.unwrap().unwrap();
        assert_eq!(profile.skills.get(&skill).unwrap().level, "Intermediate");

        let blocklist = f.kv.get("completed_recommendations_blocklist").await.unwrap().unwrap();
        assert!(blocklist.contains(&item.title));
    }

    #[tokio::test]
    async fn test_complete_unknown_title_is_not_found() {
        let f = fixture(None);
        f.session.refresh().await.unwrap();
        assert_eq!(f.session.complete("No Such Course").await, Completion::NotFound);
    }

    #[tokio::test]
    async fn test_completion_from_previous_user_is_refused() {
        let remote_kv = Arc::new(MemoryKeyValueStore::new());
        let remote: Arc<dyn ProfileStore> = Arc::new(LocalProfileStore::new(remote_kv.clone()));
        let f = fixture(Some(remote));

        f.session.switch_user(None).await.unwrap();
        let guest_view = f.session.save_goal(agri_goal()).await.unwrap();
        let title = guest_view
            .items
            .first()
            .expect("guest has recommendations")
            .title
            .clone();

        f.session.switch_user(Some("u2".to_string())).await.unwrap();
        assert_eq!(
            f.session.complete_from(&guest_view, &title).await,
            Completion::UserChanged
        );

        assert!(remote_kv.get("userProfile").await.unwrap().is_none());
        assert!(f.kv.get("userProfile").await.unwrap().is_none());
        assert!(f
            .kv
            .get("completed_recommendations_blocklist")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_completion_is_monotonic_across_passes() {
        let f = fixture(None);
        let skills: SkillSet = vec![
            UserSkill::new("Soil Science", "Beginner"),
            UserSkill::new("Agricultural Technology", "Advanced"),
        ]
        .into();
        let view = f
            .session
            .save_profile(ProfilePatch {
                goal: Some(agri_goal()),
                ..ProfilePatch::skills(skills)
            })
            .await
            .unwrap();

        let capstone = view
            .items
            .iter()
            .find(|i| {
                i.kind == ItemKind::Project
                    && i.related_skill.as_deref() == Some("Agricultural Technology")
            })
            .cloned()
            .expect("capstone project for the role");
        let Completion::Done(view) = f.session.complete(&capstone.title).await else {
            panic!("capstone completion failed");
        };
        let profile = f.session.profile().await.unwrap().unwrap();
        assert_eq!(
            profile.skills.get("Agricultural Technology").unwrap().level,
            "Advanced"
        );

        let course = view
            .items
            .iter()
            .find(|i| {
                i.kind == ItemKind::Course && i.related_skill.as_deref() == Some("Soil Science")
            })
            .cloned()
            .expect("course for the weak skill");
        assert!(matches!(
            f.session.complete(&course.title).await,
            Completion::Done(_)
        ));
        let profile = f.session.profile().await.unwrap().unwrap();
        assert_eq!(profile.skills.get("Soil Science").unwrap().level, "Intermediate");
        assert_eq!(
            profile.skills.get("Agricultural Technology").unwrap().level,
            "Advanced"
        );
    }

    #[test]
    fn test_completion_skill_prefers_related_skill() {
        let mut item = RecommendationItem::new(ItemKind::Course, "Title", "P")
            .with_tags(["Tag"])
            .with_purpose("Learn GIS Mapping");
        assert_eq!(completion_skill(&item), "Learn GIS Mapping");
        item.related_skill = Some("GIS Mapping".to_string());
        assert_eq!(completion_skill(&item), "GIS Mapping");
        item.purpose = None;
        item.related_skill = None;
        assert_eq!(completion_skill(&item), "Tag");
    }
}
