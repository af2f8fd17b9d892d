//! In-memory stand-ins for the repositories and resume store, plus request helpers
//! for driving the full router in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    response::IntoResponse,
    Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use crate::applications::repository::{attach_jobs, ApplicationRepository};
use crate::auth::password::hash_password;
use crate::auth::users::UserRepository;
use crate::config::Config;
use crate::errors::AppError;
use crate::jobs::repository::JobRepository;
use crate::models::application::{
    Application, ApplicationStatus, ApplicationWithJob, NewApplication,
};
use crate::models::job::{Job, JobInput};
use crate::models::user::{NewUser, Role, User};
use crate::routes::build_router;
use crate::session::{SessionCodec, SessionUser};
use crate::state::AppState;
use crate::storage::{ResumeFile, ResumeStore};

pub const TEST_PASSWORD: &str = "correct-horse";
const BOUNDARY: &str = "jobboard-test-boundary";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        s3_bucket: "resumes".into(),
        s3_endpoint: "http://localhost:9000".into(),
        s3_region: "us-east-1".into(),
        s3_public_url: "http://localhost:9000".into(),
        aws_access_key_id: "test".into(),
        aws_secret_access_key: "test".into(),
        session_secret: "test-session-secret-that-is-at-least-32-bytes".into(),
        session_cookie_secure: false,
        session_ttl_days: 14,
        bcrypt_cost: 4,
        max_resume_bytes: 1024 * 1024,
        run_migrations: false,
        admin: None,
        port: 0,
        rust_log: "debug".into(),
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<Vec<User>>,
    next_id: AtomicI32,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<Option<User>, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(Some(created))
    }
}

impl MemoryUsers {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[derive(Default)]
pub struct MemoryJobs {
    jobs: Mutex<Vec<Job>>,
    next_id: AtomicI32,
}

impl MemoryJobs {
    pub fn count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn by_id(&self) -> HashMap<i32, Job> {
        let jobs = self.jobs.lock().unwrap();
        jobs.iter().map(|j| (j.id, j.clone())).collect()
    }
}

#[async_trait]
impl JobRepository for MemoryJobs {
    async fn list(&self) -> Result<Vec<Job>, AppError> {
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn find(&self, id: i32) -> Result<Option<Job>, AppError> {
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn create(&self, input: &JobInput, posted_by_id: i32) -> Result<Job, AppError> {
        let job = Job {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: input.title.clone(),
            description: input.description.clone(),
            category: input.category.clone(),
            location: input.location.clone(),
            salary: input.salary,
            posted_by_id,
            created_at: Utc::now(),
        };
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job)
    }

    async fn update(&self, id: i32, input: &JobInput) -> Result<Option<Job>, AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        job.title = input.title.clone();
        job.description = input.description.clone();
        job.category = input.category.clone();
        job.location = input.location.clone();
        job.salary = input.salary;
        Ok(Some(job.clone()))
    }

    async fn delete(&self, id: i32) -> Result<Option<Job>, AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        let position = jobs.iter().position(|j| j.id == id);
        Ok(position.map(|i| jobs.remove(i)))
    }
}

pub struct MemoryApplications {
    jobs: Arc<MemoryJobs>,
    applications: Mutex<Vec<Application>>,
    next_id: AtomicI32,
    fail_inserts: AtomicBool,
}

impl MemoryApplications {
    pub fn new(jobs: Arc<MemoryJobs>) -> Self {
        Self {
            jobs,
            applications: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(0),
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn count(&self) -> usize {
        self.applications.lock().unwrap().len()
    }

    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ApplicationRepository for MemoryApplications {
    async fn create(&self, application: NewApplication) -> Result<Application, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let created = Application {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_name: application.user_name,
            email: application.email,
            cover_letter: application.cover_letter,
            resume: application.resume,
            status: ApplicationStatus::Pending,
            job_id: application.job_id,
            user_id: application.user_id,
            created_at: Utc::now(),
        };
        self.applications.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Application>, AppError> {
        Ok(self.applications.lock().unwrap().clone())
    }

    async fn find(&self, id: i32) -> Result<Option<Application>, AppError> {
        let applications = self.applications.lock().unwrap();
        Ok(applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<ApplicationWithJob>, AppError> {
        let mine: Vec<Application> = self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        Ok(attach_jobs(mine, &self.jobs.by_id()))
    }

    async fn set_status(
        &self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError> {
        let mut applications = self.applications.lock().unwrap();
        let Some(application) = applications.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        application.status = status;
        Ok(Some(application.clone()))
    }

    async fn delete(&self, id: i32) -> Result<Option<Application>, AppError> {
        let mut applications = self.applications.lock().unwrap();
        let position = applications.iter().position(|a| a.id == id);
        Ok(position.map(|i| applications.remove(i)))
    }
}

/// Keeps uploaded resumes in memory and can be told to fail.
#[derive(Default)]
pub struct RecordingResumeStore {
    uploads: Mutex<Vec<(i32, ResumeFile)>>,
    fail: AtomicBool,
}

impl RecordingResumeStore {
    pub fn uploads(&self) -> Vec<(i32, ResumeFile)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResumeStore for RecordingResumeStore {
    async fn upload(&self, job_id: i32, file: &ResumeFile) -> Result<String, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Storage("simulated outage".into()));
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((job_id, file.clone()));
        Ok(format!(
            "http://localhost:9000/resumes/job-{job_id}/{}-{}",
            uploads.len(),
            file.file_name
        ))
    }
}

pub struct TestApp {
    pub state: AppState,
    pub users: Arc<MemoryUsers>,
    pub jobs: Arc<MemoryJobs>,
    pub applications: Arc<MemoryApplications>,
    pub resumes: Arc<RecordingResumeStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let users = Arc::new(MemoryUsers::default());
        let jobs = Arc::new(MemoryJobs::default());
        let applications = Arc::new(MemoryApplications::new(jobs.clone()));
        let resumes = Arc::new(RecordingResumeStore::default());
        let state = AppState {
            users: users.clone(),
            jobs: jobs.clone(),
            applications: applications.clone(),
            resumes: resumes.clone(),
            sessions: SessionCodec::new(&config.session_secret, false, config.session_ttl_days),
            config,
        };
        Self {
            state,
            users,
            jobs,
            applications,
            resumes,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Registers a user directly in the store with `TEST_PASSWORD`.
    pub async fn add_user(&self, name: &str, email: &str, role: Role) -> User {
        let password_hash = hash_password(TEST_PASSWORD, 4).await.unwrap();
        self.users
            .create(NewUser {
                name: name.into(),
                email: email.into(),
                password_hash,
                role,
            })
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn seed_job(&self, title: &str, posted_by_id: i32) -> Job {
        self.jobs
            .create(
                &JobInput {
                    title: title.into(),
                    description: format!("{title} description"),
                    category: "Engineering".into(),
                    location: "Remote".into(),
                    salary: 90_000.0,
                },
                posted_by_id,
            )
            .await
            .unwrap()
    }

    /// `name=value` cookie pair for a session of `user`, as a browser would send it.
    pub fn session_cookie(&self, user: &User) -> String {
        let jar = PrivateCookieJar::new(self.state.sessions.key().clone());
        let jar = self
            .state
            .sessions
            .seal(jar, &SessionUser::from(user))
            .unwrap();
        let response = jar.into_response();
        cookie_pair(response.headers()).unwrap()
    }
}

/// First `name=value` pair of the response's `Set-Cookie` header.
pub fn cookie_pair(headers: &HeaderMap) -> Option<String> {
    let set_cookie = headers.get(header::SET_COOKIE)?.to_str().ok()?;
    set_cookie.split(';').next().map(str::to_string)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Builds a `multipart/form-data` request from text fields and an optional resume.
pub fn multipart_request(
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    resume: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = resume {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn application_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("fullName", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("coverLetter", "I would love to build analytical engines."),
    ]
}
