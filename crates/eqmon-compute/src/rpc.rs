//! Ethereum JSON-RPC (`eth_call`) access to the equilibrium contract.

use crate::contract::{BoxFuture, EquilibriumContract, IEquilibrium};
use crate::error::{ComputeError, ComputeResult};
use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// JSON-RPC endpoint and contract location.
#[derive(Debug, Clone)]
pub struct JsonRpcConfig {
    pub rpc_url: String,
    /// Hex contract address (0x...).
    pub contract_address: String,
    /// Block tag or number for `eth_call`.
    pub block: String,
    /// Without a timeout the request relies on the client's defaults.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (CallObject<'a>, &'a str),
}

#[derive(Debug, Serialize)]
struct CallObject<'a> {
    to: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Contract reached through `eth_call`.
pub struct JsonRpcContract {
    client: Client,
    config: JsonRpcConfig,
    /// Checksummed contract address.
    to: String,
    next_id: AtomicU64,
}

impl JsonRpcContract {
    pub fn new(config: JsonRpcConfig) -> ComputeResult<Self> {
        let address: Address = config
            .contract_address
            .parse()
            .map_err(|e| ComputeError::Abi(format!("Invalid contract address: {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ComputeError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            to: address.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<C: SolCall>(&self, call: C) -> ComputeResult<C::Return> {
        let data = format!("0x{}", hex::encode(call.abi_encode()));
        let bytes = self.eth_call(data).await?;
        C::abi_decode_returns(&bytes, true).map_err(|e| ComputeError::Abi(e.to_string()))
    }

    async fn eth_call(&self, data: String) -> ComputeResult<Vec<u8>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method: "eth_call",
            params: (
                CallObject {
                    to: &self.to,
                    data,
                },
                self.config.block.as_str(),
            ),
        };

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ComputeError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ComputeError::Transport(format!("HTTP {status}: {body}")));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| ComputeError::Decode(format!("Invalid JSON-RPC response: {e}")))?;
        debug!(id, "eth_call response received");

        decode_rpc_response(body)
    }
}

fn decode_rpc_response(response: RpcResponse) -> ComputeResult<Vec<u8>> {
    if let Some(error) = response.error {
        let message = match error.data {
            Some(data) => format!("{} ({data})", error.message),
            None => error.message,
        };
        return Err(ComputeError::Rpc {
            code: error.code,
            message,
        });
    }

    let result = response
        .result
        .ok_or_else(|| ComputeError::Decode("Response has neither result nor error".to_string()))?;
    let hex_data = result.strip_prefix("0x").unwrap_or(&result);
    hex::decode(hex_data).map_err(|e| ComputeError::Decode(format!("Invalid hex result: {e}")))
}

impl EquilibriumContract for JsonRpcContract {
    fn compute_equilibrium(&self, eta: i64, lambda: i64) -> BoxFuture<'_, ComputeResult<i64>> {
        Box::pin(async move {
            let ret = self
                .call(IEquilibrium::computeEquilibriumCall { eta, lambda })
                .await?;
            Ok(ret._0)
        })
    }

    fn efficiency(&self, delta: i64) -> BoxFuture<'_, ComputeResult<i64>> {
        Box::pin(async move {
            let ret = self.call(IEquilibrium::efficiencyCall { delta }).await?;
            Ok(ret._0)
        })
    }

    fn is_optimal(&self, delta: i64) -> BoxFuture<'_, ComputeResult<bool>> {
        Box::pin(async move {
            let ret = self.call(IEquilibrium::isOptimalCall { delta }).await?;
            Ok(ret._0)
        })
    }
}
