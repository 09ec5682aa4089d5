//! HTTP-level tests for the ledger client adapter, against a mock server.

use pi_bootstrap::amount::Amount;
use pi_bootstrap::crypto::KeyPair;
use pi_bootstrap::horizon::{ClientError, HorizonClient, LedgerClient, SubmissionResult};
use pi_bootstrap::tx::{Network, Operation, Orchestrator, TransactionPlan};
use std::sync::Arc;

fn client_for(server: &mockito::ServerGuard) -> HorizonClient {
    HorizonClient::new(&server.url()).unwrap()
}

fn signed_envelope(client: Arc<HorizonClient>) -> pi_bootstrap::tx::SignedEnvelope {
    let source = KeyPair::random();
    let orchestrator = Orchestrator::new(client, Network::new("Pi Testnet"));
    let plan: TransactionPlan = orchestrator
        .build(
            source.address(),
            7,
            1_000_000,
            vec![Operation::SetOptions {
                home_domain: "token.example.org".into(),
            }],
            300,
        )
        .unwrap();
    orchestrator.sign(plan, &[&source]).unwrap()
}

#[tokio::test]
async fn get_account_parses_the_account_resource() {
    let mut server = mockito::Server::new_async().await;
    let address = KeyPair::random().address();

    let body = format!(
        r#"{{
            "account_id": "{}",
            "sequence": "103720918407102567",
            "balances": [{{"asset_type": "native", "balance": "150.0000000"}}]
        }}"#,
        address
    );
    let mock = server
        .mock("GET", format!("/accounts/{}", address).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let snapshot = client.get_account(&address).await.unwrap().unwrap();
    assert_eq!(snapshot.sequence, 103720918407102567);
    assert_eq!(
        snapshot.native_balance().unwrap(),
        Amount::parse("150").unwrap()
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn get_account_distinguishes_not_found_from_transport_failure() {
    let mut server = mockito::Server::new_async().await;
    let address = KeyPair::random().address();

    let _m1 = server
        .mock("GET", format!("/accounts/{}", address).as_str())
        .with_status(404)
        .create_async()
        .await;

    let client = client_for(&server);
    // 404 is a clean None...
    assert!(client.get_account(&address).await.unwrap().is_none());

    // ...while a 5xx is an error.
    let mut failing = mockito::Server::new_async().await;
    let _m2 = failing
        .mock("GET", format!("/accounts/{}", address).as_str())
        .with_status(500)
        .create_async()
        .await;
    let client = client_for(&failing);
    assert!(matches!(
        client.get_account(&address).await,
        Err(ClientError::UnexpectedStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn ledger_stats_combine_base_fee_and_percentile() {
    let mut server = mockito::Server::new_async().await;
    let _m3 = server
        .mock("GET", "/ledgers?order=desc&limit=1")
        .with_status(200)
        .with_body(
            r#"{"_embedded": {"records": [{"base_fee_in_stroops": 1000000}]}}"#,
        )
        .create_async()
        .await;
    let _m4 = server
        .mock("GET", "/fee_stats")
        .with_status(200)
        .with_body(r#"{"fee_charged": {"p70": "1500000"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let stats = client.latest_ledger_stats().await.unwrap();
    assert_eq!(stats.base_fee, 1_000_000);
    assert_eq!(stats.recommended_p70, Some(1_500_000));
}

#[tokio::test]
async fn missing_fee_stats_degrade_to_no_recommendation() {
    let mut server = mockito::Server::new_async().await;
    let _m5 = server
        .mock("GET", "/ledgers?order=desc&limit=1")
        .with_status(200)
        .with_body(
            r#"{"_embedded": {"records": [{"base_fee_in_stroops": 1000000}]}}"#,
        )
        .create_async()
        .await;
    let _m6 = server
        .mock("GET", "/fee_stats")
        .with_status(404)
        .create_async()
        .await;

    let client = client_for(&server);
    let stats = client.latest_ledger_stats().await.unwrap();
    assert_eq!(stats.base_fee, 1_000_000);
    assert_eq!(stats.recommended_p70, None);
}

#[tokio::test]
async fn pool_probe_maps_status_to_existence() {
    let mut server = mockito::Server::new_async().await;
    let pool_id: pi_bootstrap::pool::PoolId = "ab".repeat(32).parse().unwrap();

    let _m7 = server
        .mock("GET", format!("/liquidity_pools/{}", pool_id).as_str())
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    assert!(client_for(&server).pool_exists(&pool_id).await.unwrap());

    let mut absent = mockito::Server::new_async().await;
    let _m8 = absent
        .mock("GET", format!("/liquidity_pools/{}", pool_id).as_str())
        .with_status(404)
        .create_async()
        .await;
    assert!(!client_for(&absent).pool_exists(&pool_id).await.unwrap());
}

#[tokio::test]
async fn submit_classifies_acceptance() {
    let mut server = mockito::Server::new_async().await;
    let _m9 = server
        .mock("POST", "/transactions")
        .with_status(200)
        .with_body(format!(r#"{{"hash": "{}", "ledger": 123456}}"#, "cd".repeat(32)))
        .create_async()
        .await;

    let client = Arc::new(client_for(&server));
    let envelope = signed_envelope(client.clone());
    match client.submit(&envelope).await {
        SubmissionResult::Accepted { hash, ledger } => {
            assert_eq!(hash.to_string(), "cd".repeat(32));
            assert_eq!(ledger, 123456);
        }
        other => panic!("expected acceptance, got {:?}", other.describe()),
    }
}

#[tokio::test]
async fn submit_carries_the_rejection_payload_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let _m10 = server
        .mock("POST", "/transactions")
        .with_status(400)
        .with_body(
            r#"{
                "title": "Transaction Failed",
                "status": 400,
                "extras": {"result_codes": {"transaction": "tx_bad_seq", "operations": []}}
            }"#,
        )
        .create_async()
        .await;

    let client = Arc::new(client_for(&server));
    let envelope = signed_envelope(client.clone());
    match client.submit(&envelope).await {
        SubmissionResult::Rejected { payload } => {
            assert_eq!(payload.status, 400);
            assert_eq!(
                payload.result_codes.unwrap().transaction.as_deref(),
                Some("tx_bad_seq")
            );
        }
        other => panic!("expected rejection, got {:?}", other.describe()),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure_not_a_rejection() {
    // A server that is immediately dropped leaves a dead port behind.
    let server = mockito::Server::new_async().await;
    let url = server.url();
    drop(server);

    let client = Arc::new(HorizonClient::new(&url).unwrap());
    let envelope = signed_envelope(client.clone());
    assert!(matches!(
        client.submit(&envelope).await,
        SubmissionResult::NetworkFailure { .. }
    ));
}

#[tokio::test]
async fn pool_activity_resources_parse_embedded_records() {
    let mut server = mockito::Server::new_async().await;
    let pool_id: pi_bootstrap::pool::PoolId = "ab".repeat(32).parse().unwrap();

    let _m11 = server
        .mock(
            "GET",
            format!("/liquidity_pools/{}/transactions?order=desc&limit=200", pool_id).as_str(),
        )
        .with_status(200)
        .with_body(
            r#"{"_embedded": {"records": [
                {"hash": "aa", "created_at": "2024-03-07T08:10:00Z"},
                {"hash": "bb", "created_at": "2024-03-07T09:10:00Z"}
            ]}}"#,
        )
        .create_async()
        .await;
    let _m12 = server
        .mock(
            "GET",
            format!("/liquidity_pools/{}/operations?order=desc&limit=200", pool_id).as_str(),
        )
        .with_status(200)
        .with_body(
            r#"{"_embedded": {"records": [
                {"id": "1", "source_account": "GWHALE", "type": "liquidity_pool_deposit",
                 "created_at": "2024-03-07T08:10:00Z"}
            ]}}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let txs = client.pool_transactions(&pool_id, 200).await.unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].hash, "aa");

    let ops = client.pool_operations(&pool_id, 200).await.unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].source_account, "GWHALE");
}
