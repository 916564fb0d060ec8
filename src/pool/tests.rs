use std::future::Future;
use std::io::Read;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use url::Url;

use super::WorkerPool;
use crate::args::{HttpMethod, SuccessRule};
use crate::error::{AppError, AppResult};
use crate::http::{RequestSpec, build_client};
use crate::metrics::Aggregate;
use crate::shutdown::shutdown_channel;

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

/// Nothing listens on the discard port, so every request is refused fast.
fn refused_spec() -> AppResult<Arc<RequestSpec>> {
    let url = Url::parse("http://127.0.0.1:9/")
        .map_err(|err| AppError::validation(format!("url parse failed: {}", err)))?;
    Ok(Arc::new(RequestSpec {
        method: HttpMethod::Get,
        url,
        headers: Vec::new(),
        form: Vec::new(),
    }))
}

#[test]
fn slots_keep_refilling_until_the_signal_and_drain_cleanly() -> AppResult<()> {
    run_async_test(async {
        let client = build_client(Duration::from_millis(500), Duration::from_millis(250), 0)?;
        let spec = refused_spec()?;
        let aggregate = Arc::new(Aggregate::new());
        let (shutdown_tx, _) = shutdown_channel();

        let pool = WorkerPool::spawn(
            3,
            &client,
            &spec,
            SuccessRule::Under400,
            &aggregate,
            &shutdown_tx,
        );
        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(shutdown_tx.send(()));

        let clean = pool.drain(Duration::from_secs(2)).await;
        assert!(clean);

        let settled = aggregate.snapshot();
        assert!(settled.total > 0);
        assert_eq!(settled.success, 0);
        assert_eq!(settled.total, settled.failed);

        // Every slot has exited; the counters are frozen.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let later = aggregate.snapshot();
        assert_eq!(later.total, settled.total);
        Ok(())
    })
}

#[test]
fn a_single_slot_runs_the_same_loop_as_larger_pools() -> AppResult<()> {
    run_async_test(async {
        let client = build_client(Duration::from_millis(500), Duration::from_millis(250), 0)?;
        let spec = refused_spec()?;
        let aggregate = Arc::new(Aggregate::new());
        let (shutdown_tx, _) = shutdown_channel();

        let pool = WorkerPool::spawn(
            1,
            &client,
            &spec,
            SuccessRule::Under400,
            &aggregate,
            &shutdown_tx,
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(shutdown_tx.send(()));
        assert!(pool.drain(Duration::from_secs(2)).await);

        let snapshot = aggregate.snapshot();
        assert!(snapshot.total > 0);
        assert_eq!(
            snapshot.total,
            snapshot.success.saturating_add(snapshot.failed)
        );
        Ok(())
    })
}

#[test]
fn drain_abandons_requests_that_outlive_the_timeout() -> AppResult<()> {
    run_async_test(async {
        // Accepts the connection, reads the request, then never answers.
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| AppError::validation(format!("bind test server failed: {}", err)))?;
        let addr = listener
            .local_addr()
            .map_err(|err| AppError::validation(format!("server addr failed: {}", err)))?;
        thread::spawn(move || {
            for incoming in listener.incoming() {
                let Ok(mut stream) = incoming else { break };
                thread::spawn(move || {
                    let mut buffer = [0u8; 1024];
                    if stream.read(&mut buffer).is_ok() {
                        thread::sleep(Duration::from_secs(5));
                    }
                });
            }
        });

        let url = Url::parse(&format!("http://{}", addr))
            .map_err(|err| AppError::validation(format!("server url failed: {}", err)))?;
        let spec = Arc::new(RequestSpec {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            form: Vec::new(),
        });
        let client = build_client(Duration::from_secs(10), Duration::from_secs(1), 0)?;
        let aggregate = Arc::new(Aggregate::new());
        let (shutdown_tx, _) = shutdown_channel();

        let pool = WorkerPool::spawn(
            1,
            &client,
            &spec,
            SuccessRule::Under400,
            &aggregate,
            &shutdown_tx,
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(shutdown_tx.send(()));

        let clean = pool.drain(Duration::from_millis(300)).await;
        assert!(!clean);

        // The abandoned request is excluded from both counts.
        let snapshot = aggregate.snapshot();
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.success, 0);
        assert_eq!(snapshot.failed, 0);
        Ok(())
    })
}
