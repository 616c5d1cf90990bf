/*
[INPUT]:  Upstream base URL for a proxy under test
[OUTPUT]: Running proxy on an ephemeral port plus its shutdown token
[POS]:    Test infrastructure - shared across proxy integration tests
[UPDATE]: When proxy startup signature changes
*/

use std::net::SocketAddr;

use fragrance_research_adapter::ClientConfig;
use fragrance_research_proxy::{TaskProxy, serve_on};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use url::Url;

pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: CancellationToken,
    pub handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        self.handle
            .await
            .expect("proxy task join")
            .expect("proxy exited cleanly");
    }
}

pub async fn spawn_proxy(upstream: &str) -> RunningProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let proxy = TaskProxy::new(Url::parse(upstream).expect("upstream url"), &ClientConfig::default())
        .expect("proxy");
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(serve_on(listener, proxy, shutdown.clone()));

    RunningProxy {
        addr,
        shutdown,
        handle,
    }
}
