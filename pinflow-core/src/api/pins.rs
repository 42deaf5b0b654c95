// File: pinflow-core/src/api/pins.rs

use pinflow_common::Error;
use pinflow_common::models::{Ack, Pin, PinUpdate};

use super::ApiClient;

impl ApiClient {
    pub async fn pins(&self) -> Result<Vec<Pin>, Error> {
        self.get_json("pins").await
    }

    /// Release a pending pin into the posting schedule.
    pub async fn approve_pin(&self, id: &str) -> Result<Ack, Error> {
        self.post_empty(&format!("pins/{id}/approve")).await
    }

    pub async fn update_pin(&self, id: &str, update: &PinUpdate) -> Result<Pin, Error> {
        self.put_json(&format!("pins/{id}"), update).await
    }

    pub async fn delete_pin(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("pins/{id}")).await
    }
}
