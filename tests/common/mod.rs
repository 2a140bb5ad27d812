use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// True when a database is configured; tests that need the full stack skip
/// themselves otherwise so the suite stays green on a bare checkout.
pub fn db_available() -> bool {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").is_ok()
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/carelink-api");
        cmd.env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL from .env
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// A registered user plus their bearer token
pub struct TestUser {
    pub id: String,
    pub token: String,
}

/// Register a fresh user with a unique email and return their token
pub async fn register_user(server: &TestServer, name: &str) -> Result<TestUser> {
    let client = reqwest::Client::new();
    let email = format!("{}-{}@example.com", name, uuid_suffix());

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({ "name": name, "email": email, "password": "s3cret-pass" }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    Ok(TestUser {
        id: body["id"].as_str().context("register returns id")?.to_string(),
        token: body["token"]
            .as_str()
            .context("register returns token")?
            .to_string(),
    })
}

/// Create a patient owned by the given user, returning its id
pub async fn create_patient(server: &TestServer, user: &TestUser, name: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/patients", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({
            "name": name,
            "age": 34,
            "gender": "female",
            "contactNumber": "555-0101",
            "address": "12 Harbor St",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "patient creation failed: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    Ok(body["id"].as_str().context("patient has id")?.to_string())
}

/// Create a doctor owned by the given user, returning its id
pub async fn create_doctor(server: &TestServer, user: &TestUser, name: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/doctors", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({
            "name": name,
            "specialization": "Cardiology",
            "experience": 8,
            "contactNumber": "555-0202",
            "email": format!("{}-{}@clinic.example.com", name, uuid_suffix()),
            "address": "1 Clinic Way",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "doctor creation failed: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    Ok(body["id"].as_str().context("doctor has id")?.to_string())
}

fn uuid_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
