use redis::Client;

use crate::utils::AppError;

#[derive(Clone)]
pub struct RedisClient {
    pub client: Client,
}

impl RedisClient {
    pub fn new(url: &str) -> Result<Self, AppError> {
        let client = Client::open(url)?;
        Ok(Self { client })
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
