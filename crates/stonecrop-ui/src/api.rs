use gloo::net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use stonecrop_core::{
    Category, CategoryDraft, CategoryId, Task, TaskDraft, TaskId, TaskPatch,
};

const STORE_URL_KEY: &str = "stonecrop.store.url";
const STORE_ANON_KEY: &str = "stonecrop.store.key";
const DEFAULT_STORE_URL: &str = "http://localhost:54321";

/// Thin binding to the hosted table store's REST surface. Two tables,
/// `tasks` and `categories`; equality filters on id plus the non-null
/// due-date filter are the only query shapes used.
#[derive(Clone, PartialEq)]
pub struct Store {
    base_url: String,
    anon_key: String,
}

impl Store {
    /// Connection settings are an opaque external collaborator concern;
    /// they are read from localStorage and fall back to the local
    /// development store.
    pub fn from_settings() -> Self {
        let storage = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten());

        let read = |key: &str| {
            storage
                .as_ref()
                .and_then(|storage| storage.get_item(key).ok().flatten())
        };

        Self {
            base_url: read(STORE_URL_KEY)
                .unwrap_or_else(|| DEFAULT_STORE_URL.to_string()),
            anon_key: read(STORE_ANON_KEY).unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str, query: &str) -> String {
        format!("{}/rest/v1/{table}?{query}", self.base_url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", self.anon_key))
    }

    async fn select<R>(&self, table: &str, query: &str) -> Result<Vec<R>, String>
    where
        R: DeserializeOwned,
    {
        let url = self.table_url(table, query);
        let response = self
            .authorize(Request::get(&url))
            .send()
            .await
            .map_err(|err| format!("{table} select failed: {err}"))?;
        let response = checked(table, response).await?;

        response
            .json::<Vec<R>>()
            .await
            .map_err(|err| format!("{table} decode failed: {err}"))
    }

    async fn insert<B>(&self, table: &str, rows: &[B]) -> Result<(), String>
    where
        B: Serialize,
    {
        let body = serde_json::to_string(rows)
            .map_err(|err| format!("{table} encode failed: {err}"))?;
        let url = self.table_url(table, "select=*");
        let response = self
            .authorize(Request::post(&url))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .body(body)
            .map_err(|err| format!("{table} insert failed: {err}"))?
            .send()
            .await
            .map_err(|err| format!("{table} insert failed: {err}"))?;
        checked(table, response).await?;
        Ok(())
    }

    async fn patch<B>(
        &self,
        table: &str,
        query: &str,
        body: &B,
    ) -> Result<(), String>
    where
        B: Serialize,
    {
        let body = serde_json::to_string(body)
            .map_err(|err| format!("{table} encode failed: {err}"))?;
        let url = self.table_url(table, query);
        let response = self
            .authorize(Request::patch(&url))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .body(body)
            .map_err(|err| format!("{table} update failed: {err}"))?
            .send()
            .await
            .map_err(|err| format!("{table} update failed: {err}"))?;
        checked(table, response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, query: &str) -> Result<(), String> {
        let url = self.table_url(table, query);
        let response = self
            .authorize(Request::delete(&url))
            .send()
            .await
            .map_err(|err| format!("{table} delete failed: {err}"))?;
        checked(table, response).await?;
        Ok(())
    }

    pub async fn fetch_tasks(&self) -> Result<Vec<Task>, String> {
        self.select("tasks", "select=*").await
    }

    /// The calendar's restricted read: only rows with a due date.
    pub async fn fetch_due_tasks(&self) -> Result<Vec<Task>, String> {
        self.select("tasks", "select=*&due_date=not.is.null").await
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, String> {
        self.select("categories", "select=*").await
    }

    pub async fn insert_task(&self, draft: &TaskDraft) -> Result<(), String> {
        self.insert("tasks", std::slice::from_ref(draft)).await
    }

    pub async fn update_task(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> Result<(), String> {
        self.patch("tasks", &format!("id=eq.{id}"), patch).await
    }

    pub async fn delete_task(&self, id: TaskId) -> Result<(), String> {
        self.delete("tasks", &format!("id=eq.{id}")).await
    }

    /// One batched delete for clear-completed. The call is issued even for
    /// an empty id list; the store treats `id=in.()` as matching nothing.
    pub async fn delete_tasks(&self, ids: &[TaskId]) -> Result<(), String> {
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.delete("tasks", &format!("id=in.({joined})")).await
    }

    pub async fn insert_category(
        &self,
        draft: &CategoryDraft,
    ) -> Result<(), String> {
        self.insert("categories", std::slice::from_ref(draft)).await
    }

    pub async fn delete_category(&self, id: CategoryId) -> Result<(), String> {
        self.delete("categories", &format!("id=eq.{id}")).await
    }
}

async fn checked(table: &str, response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let detail = response.text().await.unwrap_or_default();
    Err(format!("{table} request rejected ({status}): {detail}"))
}
