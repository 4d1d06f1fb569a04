use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::models::Outcome;

/// Issue `requests` sequential GET requests against `url` after waiting
/// `start_delay`, sending one outcome per attempt into `sink`.
///
/// Failed requests are recorded and never retried. The worker only stops
/// early if the receiving side of `sink` has been dropped.
pub async fn run(
    id: u32,
    client: Arc<Client>,
    url: Url,
    requests: u32,
    start_delay: Duration,
    sink: mpsc::Sender<Outcome>,
) {
    sleep(start_delay).await;

    debug!(
        event = "worker_started",
        worker = id,
        delay_ms = start_delay.as_millis() as u64,
        message = "Worker started issuing requests"
    );

    for _ in 0..requests {
        let outcome = make_request(&client, &url).await;
        if sink.send(outcome).await.is_err() {
            warn!(
                event = "sink_closed",
                worker = id,
                message = "Result sink closed before the worker finished"
            );
            return;
        }
    }

    debug!(event = "worker_finished", worker = id, message = "Worker finished");
}

/// Make a single timed GET request.
///
/// Only transport failures count as failed; the status code is not
/// inspected. Latency ends when the response head arrives; the body is then
/// drained so the connection goes back to the pool.
pub async fn make_request(client: &Client, url: &Url) -> Outcome {
    let start_time = Instant::now();

    let mut response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(
                event = "request_error",
                url = url.as_str(),
                error = %e,
                message = "Request failed"
            );
            return Outcome::failure();
        }
    };
    let latency = start_time.elapsed();

    loop {
        match response.chunk().await {
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                debug!(
                    event = "body_error",
                    url = url.as_str(),
                    error = %e,
                    message = "Failed to read response body"
                );
                return Outcome::failure();
            }
        }
    }

    Outcome::success(latency)
}
