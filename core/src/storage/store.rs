//! RocksDB-based persistent storage

use super::{validate_submission, MessageStore};
use crate::types::{Message, MessageId};
use crate::{Error, Result};
use rocksdb::{Direction, IteratorMode, Options, DB};
use std::path::Path;
use tracing::debug;

const MESSAGE_PREFIX: &[u8] = b"msg:";

/// Main storage interface
pub struct Store {
    db: DB,
}

impl Store {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path)
            .map_err(|e| Error::Storage(format!("Failed to open database: {}", e)))?;

        Ok(Self { db })
    }

    fn put_message(&self, message: &Message) -> Result<()> {
        let value = serde_json::to_vec(message)
            .map_err(|e| Error::Serialization(format!("Failed to encode message: {}", e)))?;

        self.db
            .put(self.message_key(&message.id()), &value)
            .map_err(|e| Error::Storage(format!("Failed to store message: {}", e)))
    }

    fn message_key(&self, id: &MessageId) -> Vec<u8> {
        let mut key = MESSAGE_PREFIX.to_vec();
        key.extend_from_slice(id.as_bytes());
        key
    }
}

impl MessageStore for Store {
    fn save(&self, text: &str, user: &str) -> Result<Message> {
        validate_submission(text, user)?;

        let message = Message::new(text.to_string(), user.to_string());
        self.put_message(&message)?;
        debug!("Stored message {}", message.id());

        Ok(message)
    }

    fn get(&self, id: &MessageId) -> Result<Option<Message>> {
        match self.db.get(self.message_key(id)) {
            Ok(Some(value)) => {
                let message = serde_json::from_slice(&value)
                    .map_err(|e| Error::Serialization(format!("Failed to decode message: {}", e)))?;
                Ok(Some(message))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(Error::Storage(format!("Failed to get message: {}", e))),
        }
    }

    fn count(&self) -> Result<usize> {
        let iter = self
            .db
            .iterator(IteratorMode::From(MESSAGE_PREFIX, Direction::Forward));

        let mut count = 0;
        for item in iter {
            let (key, _) = item.map_err(|e| Error::Storage(format!("Iterator error: {}", e)))?;
            if !key.starts_with(MESSAGE_PREFIX) {
                break;
            }
            count += 1;
        }

        Ok(count)
    }
}
