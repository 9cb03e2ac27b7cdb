//! Polygon API client
//!
//! Implements the authenticated request cycle of the Polygon judge-authoring
//! API and the upload flow that pushes an extracted statement into it.
//!
//! # Request signing
//!
//! Every call carries `apiKey`, the unix `time`, and an `apiSig` parameter:
//! a random six-letter prefix followed by the SHA-512 of
//! `prefix/method?k1=v1&...&kN=vN#secret`, with parameters sorted by key
//! then value. File contents participate in the signature exactly as posted
//! in the multipart body.
//!
//! # Response envelope
//!
//! Responses are JSON objects with a `status` field; anything but `"OK"`
//! surfaces the accompanying `comment` as [`PolygonError::Api`]. The
//! `result` payload is handed back as raw JSON for the caller to pick apart.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::blocking::multipart;
use sha2::{Digest, Sha512};
use tracing::{debug, info, warn};

use crate::config::PolygonConfig;
use crate::converter::add_paragraph_breaks;
use crate::error::PolygonError;
use crate::statement::ProblemStatement;

/// Timeout for API calls; statement resources can be sizable.
const CALL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

/// A file attached to a call as a multipart part.
pub struct FileUpload {
    /// Form field name, `file` for statement resources
    pub field: String,
    /// File name sent with the part
    pub name: String,
    pub content: Vec<u8>,
}

/// Synchronous Polygon API client.
pub struct PolygonClient {
    api_key: String,
    secret: String,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl PolygonClient {
    /// Build a client from loaded credentials.
    pub fn new(config: PolygonConfig) -> Result<Self, PolygonError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(CALL_TIMEOUT)
            .build()
            .map_err(|err| PolygonError::Transport(err.to_string()))?;
        Ok(Self {
            api_key: config.key,
            secret: config.secret,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Invoke an API method and return its `result` payload.
    ///
    /// `params` are the method's own parameters; `apiKey`, `time` and
    /// `apiSig` are added here. With a `file`, the request goes out as
    /// multipart and the file bytes are included in the signature.
    pub fn call(
        &self,
        method: &str,
        params: Vec<(String, String)>,
        file: Option<FileUpload>,
    ) -> Result<serde_json::Value, PolygonError> {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);

        let mut full_params = params;
        full_params.push(("apiKey".to_string(), self.api_key.clone()));
        full_params.push(("time".to_string(), time.to_string()));

        let mut sign_params: Vec<(Vec<u8>, Vec<u8>)> = full_params
            .iter()
            .map(|(key, value)| (key.clone().into_bytes(), value.clone().into_bytes()))
            .collect();
        if let Some(upload) = &file {
            sign_params.push((upload.field.clone().into_bytes(), upload.content.clone()));
        }

        let prefix: String = (0..6).map(|_| fastrand::lowercase()).collect();
        let api_sig = sign(&self.secret, &prefix, method, sign_params);
        full_params.push(("apiSig".to_string(), api_sig));

        let url = format!("{}/{}", self.base_url, method);
        debug!(method, %url, "calling Polygon");

        let request = match file {
            None => self.http.post(&url).form(&full_params),
            Some(upload) => {
                let mut form = multipart::Form::new();
                for (key, value) in &full_params {
                    form = form.text(key.clone(), value.clone());
                }
                form = form.part(
                    upload.field,
                    multipart::Part::bytes(upload.content).file_name(upload.name),
                );
                self.http.post(&url).multipart(form)
            }
        };

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        debug!(method, %status, "Polygon answered");

        if !status.is_success() {
            return Err(PolygonError::Transport(format!(
                "{} returned HTTP {}: {}",
                method,
                status,
                truncate(&body, 200)
            )));
        }

        let payload: serde_json::Value = serde_json::from_str(&body)
            .map_err(|_| PolygonError::Json(truncate(&body, 200).to_string()))?;

        if payload.get("status").and_then(|status| status.as_str()) != Some("OK") {
            let comment = payload
                .get("comment")
                .and_then(|comment| comment.as_str())
                .unwrap_or("Unknown API error");
            return Err(PolygonError::Api(comment.to_string()));
        }

        Ok(payload
            .get("result")
            .cloned()
            .unwrap_or(serde_json::Value::Null))
    }

    /// Fetch the caller's problems as a name → id map.
    ///
    /// Used to make uploads idempotent: re-running an import updates the
    /// existing problems instead of failing on `problem.create`.
    pub fn list_problems(&self) -> Result<HashMap<String, i64>, PolygonError> {
        let result = self.call("problems.list", Vec::new(), None)?;
        let mut problems = HashMap::new();
        if let Some(entries) = result.as_array() {
            for entry in entries {
                if let (Some(name), Some(id)) = (
                    entry.get("name").and_then(|name| name.as_str()),
                    entry.get("id").and_then(|id| id.as_i64()),
                ) {
                    problems.insert(name.to_string(), id);
                }
            }
        }
        Ok(problems)
    }
}

/// Compute an `apiSig` value.
///
/// Parameters are sorted by key then value; the digest input is
/// `prefix/method?payload#secret` where payload joins `key=value` pairs
/// with `&`. Split out from [`PolygonClient::call`] so the scheme is
/// testable with a fixed prefix.
fn sign(secret: &str, prefix: &str, method: &str, mut params: Vec<(Vec<u8>, Vec<u8>)>) -> String {
    params.sort();

    let mut payload = Vec::new();
    for (idx, (key, value)) in params.iter().enumerate() {
        if idx > 0 {
            payload.push(b'&');
        }
        payload.extend_from_slice(key);
        payload.push(b'=');
        payload.extend_from_slice(value);
    }

    let mut source = Vec::new();
    source.extend_from_slice(prefix.as_bytes());
    source.push(b'/');
    source.extend_from_slice(method.as_bytes());
    source.push(b'?');
    source.extend_from_slice(&payload);
    source.push(b'#');
    source.extend_from_slice(secret.as_bytes());

    format!("{}{}", prefix, hex::encode(Sha512::digest(&source)))
}

/// Upload one statement as the named Polygon problem.
///
/// Creates the problem (or reuses an existing one from `existing_problems`),
/// updates limits, saves the statement fields, uploads resources and sample
/// tests, and commits when a message is given. Statement fields are posted
/// with paragraph breaks promoted, as the Polygon editor expects.
pub fn upload_problem(
    client: &PolygonClient,
    statement: &ProblemStatement,
    polygon_name: &str,
    lang: &str,
    commit_message: Option<&str>,
    existing_problems: &mut HashMap<String, i64>,
) -> Result<(), PolygonError> {
    let problem_id = match existing_problems.get(polygon_name) {
        Some(&id) => {
            info!(polygon_name, id, "reusing existing problem");
            id
        }
        None => {
            let id = create_problem(client, polygon_name)?;
            existing_problems.insert(polygon_name.to_string(), id);
            id
        }
    };
    let problem_id_str = problem_id.to_string();

    let mut update_params = vec![("problemId".to_string(), problem_id_str.clone())];
    if let Some(ms) = statement.time_limit_ms {
        update_params.push(("timeLimit".to_string(), ms.to_string()));
    }
    if let Some(mb) = statement.memory_limit_mb {
        update_params.push(("memoryLimit".to_string(), mb.to_string()));
    }
    update_params.push(("inputFile".to_string(), "stdin".to_string()));
    update_params.push(("outputFile".to_string(), "stdout".to_string()));
    client.call("problem.updateInfo", update_params, None)?;

    let mut statement_params = vec![
        ("problemId".to_string(), problem_id_str.clone()),
        ("lang".to_string(), lang.to_string()),
        ("name".to_string(), statement.title.clone()),
    ];
    let fields = [
        ("legend", &statement.legend),
        ("input", &statement.input_spec),
        ("output", &statement.output_spec),
        ("notes", &statement.notes),
    ];
    for (field, value) in fields {
        if let Some(text) = value {
            statement_params.push((field.to_string(), add_paragraph_breaks(text)));
        }
    }
    info!(polygon_name, "saving statement");
    client.call("problem.saveStatement", statement_params, None)?;

    for resource in &statement.resources {
        info!(polygon_name, resource = %resource.name, "uploading statement resource");
        client.call(
            "problem.saveStatementResource",
            vec![
                ("problemId".to_string(), problem_id_str.clone()),
                ("name".to_string(), resource.name.clone()),
            ],
            Some(FileUpload {
                field: "file".to_string(),
                name: resource.name.clone(),
                content: resource.content.clone(),
            }),
        )?;
    }

    for (index, sample) in statement.samples.iter().enumerate() {
        info!(polygon_name, index = index + 1, "saving sample test");
        client.call(
            "problem.saveTest",
            vec![
                ("problemId".to_string(), problem_id_str.clone()),
                ("testset".to_string(), "tests".to_string()),
                ("testIndex".to_string(), (index + 1).to_string()),
                ("testInput".to_string(), sample.input.clone()),
                ("testOutput".to_string(), sample.output.clone()),
                ("testUseInStatements".to_string(), "true".to_string()),
                ("testInputForStatements".to_string(), sample.input.clone()),
                ("testOutputForStatements".to_string(), sample.output.clone()),
                (
                    "verifyInputOutputForStatements".to_string(),
                    "false".to_string(),
                ),
            ],
            None,
        )?;
    }

    if let Some(message) = commit_message {
        info!(polygon_name, message, "committing changes");
        client.call(
            "problem.commitChanges",
            vec![
                ("problemId".to_string(), problem_id_str),
                ("message".to_string(), message.to_string()),
            ],
            None,
        )?;
    }

    Ok(())
}

/// Create the problem, falling back to a list lookup when creation fails
/// because the name is already taken.
fn create_problem(client: &PolygonClient, polygon_name: &str) -> Result<i64, PolygonError> {
    info!(polygon_name, "creating problem");
    match client.call(
        "problem.create",
        vec![("name".to_string(), polygon_name.to_string())],
        None,
    ) {
        Ok(result) => result
            .get("id")
            .and_then(|id| id.as_i64())
            .ok_or_else(|| PolygonError::Json("problem.create result carries no id".to_string())),
        Err(create_err) => {
            warn!(polygon_name, error = %create_err, "creation failed, checking for an existing problem");
            let problems = client.list_problems()?;
            match problems.get(polygon_name) {
                Some(&id) => {
                    info!(polygon_name, id, "found existing problem after creation failure");
                    Ok(id)
                }
                None => Err(create_err),
            }
        }
    }
}

/// Alphabetic problem-name suffix: 0 → `a`, 25 → `z`, 26 → `aa`, …
pub fn suffix_from_index(index: usize) -> String {
    let mut suffix = String::new();
    let mut current = index as i64;
    loop {
        suffix.insert(0, (b'a' + (current % 26) as u8) as char);
        current = current / 26 - 1;
        if current < 0 {
            break;
        }
    }
    suffix
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
