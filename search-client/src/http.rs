use crate::backend::FileContent;
use crate::backend::FileFetcher;
use crate::backend::JobBackend;
use crate::backend::SearchBackend;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::error::Result;
use async_trait::async_trait;
use codesearch_protocol::EmbeddingOptions;
use codesearch_protocol::FileRequest;
use codesearch_protocol::FileResponse;
use codesearch_protocol::JobStatus;
use codesearch_protocol::MatchResult;
use codesearch_protocol::MergeRequest;
use codesearch_protocol::MergeResponse;
use codesearch_protocol::ModelOption;
use codesearch_protocol::ModelsResponse;
use codesearch_protocol::SearchRequest;
use codesearch_protocol::SearchResponse;
use codesearch_protocol::StartAck;
use codesearch_protocol::StructureOptions;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

pub const SEARCH_URL: &str = "api/search";
pub const FILE_URL: &str = "api/file";
pub const MERGE_CODES_URL: &str = "api/merge-codes";
pub const GENERATE_EMBEDDINGS_URL: &str = "api/generate-embeddings";
pub const EMBEDDING_STATUS_URL: &str = "api/embedding-status";
pub const GENERATE_STRUCTURES_URL: &str = "api/generate-structures";
pub const STRUCTURE_STATUS_URL: &str = "api/structure-status";
pub const AVAILABLE_EMBEDDINGS_URL: &str = "api/available-embeddings";

/// REST client for the code search service.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(default_headers())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<Q, T>(&self, path: &str, query: Option<&Q>) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        let mut request = self.http.get(url);
        if let Some(query) = query {
            request = request.query(query);
        }
        let resp = request.send().await?;
        decode(resp, path).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        let resp = self.http.post(url).json(body).send().await?;
        decode(resp, path).await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response, path: &str) -> Result<T> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Transport(format!(
            "{path} request failed: {status} - {body}"
        )));
    }
    Ok(resp.json().await?)
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn search(&self, query: &str, model: Option<&str>) -> Result<Vec<MatchResult>> {
        let request = SearchRequest {
            query: query.to_string(),
            model: model.map(str::to_string),
        };
        let resp: SearchResponse = self.get_json(SEARCH_URL, Some(&request)).await?;
        if let Some(error) = resp.error {
            return Err(ClientError::Backend(error));
        }
        Ok(resp.result)
    }

    async fn merge_files(&self, file_paths: &[String]) -> Result<String> {
        let request = MergeRequest {
            file_paths: file_paths.to_vec(),
        };
        let resp: MergeResponse = self.post_json(MERGE_CODES_URL, &request).await?;
        Ok(resp.result)
    }

    async fn list_models(&self) -> Result<Vec<ModelOption>> {
        let resp: ModelsResponse = self
            .get_json::<(), _>(AVAILABLE_EMBEDDINGS_URL, None)
            .await?;
        Ok(resp.models)
    }
}

#[async_trait]
impl FileFetcher for HttpBackend {
    async fn fetch_file(&self, path: &str, codebase_path: Option<&str>) -> Result<FileContent> {
        let request = FileRequest {
            path: path.to_string(),
            codebase_path: codebase_path.map(str::to_string),
        };
        let resp: FileResponse = self.get_json(FILE_URL, Some(&request)).await?;
        let entry = resp
            .result
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Backend("Failed to get the file".to_string()))?;
        if let Some(error) = entry.error {
            return Err(ClientError::Backend(error));
        }
        let lines = entry.materialize_lines();
        let path = if entry.path.is_empty() {
            path.to_string()
        } else {
            entry.path
        };
        Ok(FileContent::new(path, lines))
    }
}

#[async_trait]
impl JobBackend for HttpBackend {
    async fn start_embedding(&self, options: &EmbeddingOptions) -> Result<StartAck> {
        self.post_json(GENERATE_EMBEDDINGS_URL, options).await
    }

    async fn embedding_status(&self) -> Result<JobStatus> {
        self.get_json::<(), _>(EMBEDDING_STATUS_URL, None).await
    }

    async fn start_structure(&self, options: &StructureOptions) -> Result<StartAck> {
        self.post_json(GENERATE_STRUCTURES_URL, options).await
    }

    async fn structure_status(&self) -> Result<JobStatus> {
        self.get_json::<(), _>(STRUCTURE_STATUS_URL, None).await
    }
}
