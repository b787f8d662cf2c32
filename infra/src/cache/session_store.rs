//! Redis-backed refresh session store
//!
//! Each session is a hash under `{prefix}:{id}`. Every mutation runs as a Lua
//! script so the check and the write happen in one server-side step. The key
//! expires `retention` after the session does, so terminal sessions stay
//! readable for a while and then disappear without a sweep.
//!
//! Create and consume are not safe to replay, so a lost reply surfaces as an
//! error instead of being retried. Reads and revoke use the client's retry
//! policy.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings in UTC with
//! nanosecond precision, so a record reads back exactly as written and the
//! scripts can order two instants with a plain string comparison.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use redis::Script;
use tracing::{debug, error};

use auth_core::clock::{Clock, SystemClock};
use auth_core::domain::entities::session::{mask_session_id, ClientMetadata, RefreshSession};
use auth_core::errors::{DomainError, SessionError};
use auth_core::repositories::RefreshSessionStore;

use super::redis_client::{RedisClient, RetryPolicy};
use crate::InfrastructureError;

const FIELD_SUBJECT: &str = "subject";
const FIELD_CREATED_AT: &str = "created_at";
const FIELD_EXPIRES_AT: &str = "expires_at";
const FIELD_REVOKED_AT: &str = "revoked_at";
const FIELD_USER_AGENT: &str = "user_agent";
const FIELD_IP_ADDRESS: &str = "ip_address";

// ARGV[1] = key expiry (unix ms), ARGV[2..] = field/value pairs
const CREATE_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
redis.call('HSET', KEYS[1], unpack(ARGV, 2))
redis.call('PEXPIREAT', KEYS[1], ARGV[1])
return 1
"#;

// ARGV[1] = now (RFC 3339)
const REVOKE_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 0
end
redis.call('HSETNX', KEYS[1], 'revoked_at', ARGV[1])
return 1
"#;

// ARGV[1] = now (RFC 3339); returns {status, fields}
const CONSUME_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return {-1, {}}
end
if redis.call('HEXISTS', KEYS[1], 'revoked_at') == 1 then
    return {0, {}}
end
local expires_at = redis.call('HGET', KEYS[1], 'expires_at')
if not expires_at or expires_at <= ARGV[1] then
    return {0, {}}
end
redis.call('HSET', KEYS[1], 'revoked_at', ARGV[1])
return {1, redis.call('HGETALL', KEYS[1])}
"#;

const CONSUME_NOT_FOUND: i64 = -1;
const CONSUME_INACTIVE: i64 = 0;

/// `RefreshSessionStore` shared between service instances through Redis
pub struct RedisSessionStore {
    client: RedisClient,
    clock: Arc<dyn Clock>,
    retention: Duration,
    create_script: Script,
    revoke_script: Script,
    consume_script: Script,
}

impl RedisSessionStore {
    /// Create a store keeping terminal sessions for `retention` after expiry
    pub fn new(client: RedisClient, retention: Duration) -> Self {
        Self::with_clock(client, retention, Arc::new(SystemClock))
    }

    pub fn with_clock(client: RedisClient, retention: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            clock,
            retention,
            create_script: Script::new(CREATE_SCRIPT),
            revoke_script: Script::new(REVOKE_SCRIPT),
            consume_script: Script::new(CONSUME_SCRIPT),
        }
    }

    async fn run_script<T>(
        &self,
        policy: RetryPolicy,
        script: &Script,
        key: String,
        args: Vec<String>,
    ) -> Result<T, InfrastructureError>
    where
        T: redis::FromRedisValue + Send + 'static,
    {
        let result = self
            .client
            .execute_with_policy(policy, |mut conn| {
                let script = script.clone();
                let key = key.clone();
                let args = args.clone();
                Box::pin(async move {
                    let mut invocation = script.prepare_invoke();
                    invocation.key(&key);
                    for arg in &args {
                        invocation.arg(arg);
                    }
                    invocation.invoke_async::<_, T>(&mut conn).await
                })
            })
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl RefreshSessionStore for RedisSessionStore {
    async fn create_session(&self, id: &str, session: RefreshSession) -> Result<(), DomainError> {
        if session.id != id {
            return Err(DomainError::validation("session id does not match its key"));
        }

        let key = self.client.make_key(id);
        let key_expiry = session
            .expires_at
            .checked_add_signed(self.retention)
            .ok_or_else(|| DomainError::internal("session key expiry is out of range"))?;
        let mut args = vec![key_expiry.timestamp_millis().to_string()];
        for (field, value) in encode_session(&session) {
            args.push(field.to_string());
            args.push(value);
        }

        let created: i64 = self
            .run_script(RetryPolicy::no_retry(), &self.create_script, key, args)
            .await
            .map_err(|e| {
                error!(session = %mask_session_id(id), "failed to create session: {}", e);
                DomainError::from(e)
            })?;

        if created == 1 {
            debug!(session = %mask_session_id(id), "session created");
            Ok(())
        } else {
            Err(SessionError::AlreadyExists.into())
        }
    }

    async fn get_session(&self, id: &str) -> Result<RefreshSession, DomainError> {
        let key = self.client.make_key(id);
        let fields: HashMap<String, String> = self
            .client
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move {
                    redis::cmd("HGETALL")
                        .arg(&key)
                        .query_async::<_, HashMap<String, String>>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(InfrastructureError::from)?;

        if fields.is_empty() {
            return Err(SessionError::NotFound.into());
        }
        Ok(decode_session(id, &fields)?)
    }

    async fn revoke(&self, id: &str) -> Result<(), DomainError> {
        let now = format_timestamp(self.clock.now());
        let found: i64 = self
            .run_script(
                self.client.retry_policy(),
                &self.revoke_script,
                self.client.make_key(id),
                vec![now],
            )
            .await?;

        if found == 1 {
            Ok(())
        } else {
            Err(SessionError::NotFound.into())
        }
    }

    async fn consume(&self, id: &str) -> Result<RefreshSession, DomainError> {
        let now = format_timestamp(self.clock.now());
        let (status, fields): (i64, HashMap<String, String>) = self
            .run_script(
                RetryPolicy::no_retry(),
                &self.consume_script,
                self.client.make_key(id),
                vec![now],
            )
            .await?;

        match status {
            CONSUME_NOT_FOUND => Err(SessionError::NotFound.into()),
            CONSUME_INACTIVE => {
                debug!(session = %mask_session_id(id), "refusing to consume terminal session");
                Err(SessionError::Invalid.into())
            }
            _ => Ok(decode_session(id, &fields)?),
        }
    }

    async fn purge_expired(&self, _retention: Duration) -> Result<usize, DomainError> {
        // Keys carry their own expiry
        Ok(0)
    }
}

/// Hash fields for a session; absent optional values are left out
pub(crate) fn encode_session(session: &RefreshSession) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        (FIELD_SUBJECT, session.subject.clone()),
        (FIELD_CREATED_AT, format_timestamp(session.created_at)),
        (FIELD_EXPIRES_AT, format_timestamp(session.expires_at)),
    ];
    if let Some(revoked_at) = session.revoked_at {
        fields.push((FIELD_REVOKED_AT, format_timestamp(revoked_at)));
    }
    if let Some(user_agent) = &session.client.user_agent {
        fields.push((FIELD_USER_AGENT, user_agent.clone()));
    }
    if let Some(ip_address) = &session.client.ip_address {
        fields.push((FIELD_IP_ADDRESS, ip_address.clone()));
    }
    fields
}

/// Rebuild a session from its hash fields
pub(crate) fn decode_session(
    id: &str,
    fields: &HashMap<String, String>,
) -> Result<RefreshSession, InfrastructureError> {
    let subject = fields
        .get(FIELD_SUBJECT)
        .cloned()
        .ok_or_else(|| missing_field(id, FIELD_SUBJECT))?;
    let created_at = required_timestamp(id, fields, FIELD_CREATED_AT)?;
    let expires_at = required_timestamp(id, fields, FIELD_EXPIRES_AT)?;
    let revoked_at = fields
        .get(FIELD_REVOKED_AT)
        .map(|raw| parse_timestamp(id, FIELD_REVOKED_AT, raw))
        .transpose()?;

    Ok(RefreshSession {
        id: id.to_string(),
        subject,
        created_at,
        expires_at,
        revoked_at,
        client: ClientMetadata::new(
            fields.get(FIELD_USER_AGENT).cloned(),
            fields.get(FIELD_IP_ADDRESS).cloned(),
        ),
    })
}

fn required_timestamp(
    id: &str,
    fields: &HashMap<String, String>,
    field: &str,
) -> Result<DateTime<Utc>, InfrastructureError> {
    let raw = fields.get(field).ok_or_else(|| missing_field(id, field))?;
    parse_timestamp(id, field, raw)
}

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(id: &str, field: &str, raw: &str) -> Result<DateTime<Utc>, InfrastructureError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| {
            InfrastructureError::Corrupt(format!(
                "session {} has unreadable {}",
                mask_session_id(id),
                field
            ))
        })
}

fn missing_field(id: &str, field: &str) -> InfrastructureError {
    InfrastructureError::Corrupt(format!(
        "session {} is missing {}",
        mask_session_id(id),
        field
    ))
}
