//! JSON-RPC client for a real aggregator endpoint.

use crate::client::{AggregatorClient, SubmitAck};
use crate::config::AggregatorConfig;
use crate::error::AggregatorError;
use async_trait::async_trait;
use opal_proofs::{Authenticator, InclusionProof};
use opal_types::{RequestId, TxHash};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client for an aggregator's JSON-RPC 2.0 endpoint.
pub struct HttpAggregatorClient {
    config: AggregatorConfig,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct RpcRequest<P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitParams<'a> {
    request_id: &'a RequestId,
    authenticator: &'a Authenticator,
    transaction_hash: &'a TxHash,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProofParams<'a> {
    request_id: &'a RequestId,
}

/// The JSON-RPC error code the aggregator uses for "request id already
/// bound to a different transaction hash".
const CODE_ALREADY_SPENT: i64 = -32020;

impl HttpAggregatorClient {
    pub fn new(config: AggregatorConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
        }
    }

    async fn call<P: Serialize>(
        &self,
        method: &'static str,
        params: P,
    ) -> Result<Option<serde_json::Value>, AggregatorError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AggregatorError::Timeout
                } else if e.is_connect() {
                    AggregatorError::ServiceUnavailable(format!("connection failed: {e}"))
                } else {
                    AggregatorError::ServiceUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(AggregatorError::ServiceUnavailable(format!(
                "HTTP status {status}"
            )));
        }
        if !status.is_success() {
            return Err(AggregatorError::Rejected(format!("HTTP status {status}")));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| AggregatorError::InvalidJson(e.to_string()))?;

        if let Some(error) = body.error {
            debug!(code = error.code, message = %error.message, %method, "rpc error");
            return Err(match error.code {
                CODE_ALREADY_SPENT => AggregatorError::AlreadySpent,
                _ => AggregatorError::Rejected(error.message),
            });
        }

        Ok(body.result)
    }
}

#[async_trait]
impl AggregatorClient for HttpAggregatorClient {
    async fn submit_commitment(
        &self,
        request_id: &RequestId,
        authenticator: &Authenticator,
        transaction_hash: &TxHash,
    ) -> Result<SubmitAck, AggregatorError> {
        let result = self
            .call(
                "submit_commitment",
                SubmitParams {
                    request_id,
                    authenticator,
                    transaction_hash,
                },
            )
            .await?;

        match result {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| AggregatorError::InvalidJson(e.to_string())),
            None => Err(AggregatorError::InvalidJson(
                "submit_commitment returned no result".into(),
            )),
        }
    }

    async fn get_inclusion_proof(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<InclusionProof>, AggregatorError> {
        let result = self
            .call("get_inclusion_proof", ProofParams { request_id })
            .await?;

        match result {
            None => Ok(None),
            Some(serde_json::Value::Null) => Ok(None),
            Some(value) => {
                let proof: InclusionProof = serde_json::from_value(value)
                    .map_err(|e| AggregatorError::InvalidJson(e.to_string()))?;
                Ok(Some(proof))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_maps_already_spent() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32020,"message":"spent"}}"#;
        let parsed: RpcResponse = serde_json::from_str(body).unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.code, CODE_ALREADY_SPENT);
    }

    #[test]
    fn null_result_parses() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        let parsed: RpcResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.error.is_none());
        assert!(matches!(parsed.result, None | Some(serde_json::Value::Null)));
    }

    #[test]
    fn submit_params_use_camel_case() {
        let request_id = RequestId::new([1u8; 32]);
        let transaction_hash = TxHash::new([2u8; 32]);
        let authenticator = Authenticator {
            public_key: opal_types::PublicKey([3u8; 32]),
            signature: opal_types::Signature([4u8; 64]),
            state_hash: opal_types::StateHash::new([5u8; 32]),
        };
        let json = serde_json::to_value(SubmitParams {
            request_id: &request_id,
            authenticator: &authenticator,
            transaction_hash: &transaction_hash,
        })
        .unwrap();
        assert!(json.get("requestId").is_some());
        assert!(json.get("transactionHash").is_some());
    }
}
