use std::{convert::Infallible, net::SocketAddr, sync::Once};

use hyper::{body::Incoming, service::Service};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto::Builder,
};
use struct_bind::response::Response;
use tokio::net::TcpListener;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

pub struct TestApi {
    pub api_address: String,
    pub api_client: reqwest::Client,
}

impl TestApi {
    /// Serve `service` on a random local port.
    pub async fn spawn<S>(service: S) -> Self
    where
        S: Service<http::Request<Incoming>, Response = Response, Error = Infallible>
            + Clone
            + Send
            + 'static,
        S::Future: Send + 'static,
    {
        Self::init_telemetry();

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind the test TCP listener");
        let address = listener
            .local_addr()
            .expect("The test TCP listener doesn't have a local socket address");

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    continue;
                };
                let service = service.clone();
                tokio::spawn(async move {
                    let _ = Builder::new(TokioExecutor::new())
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        TestApi {
            api_address: format!("http://{address}"),
            api_client: reqwest::Client::new(),
        }
    }

    fn init_telemetry() {
        static INIT_TELEMETRY: Once = Once::new();
        INIT_TELEMETRY.call_once(|| {
            // Only enable the telemetry if the `TEST_LOG` environment variable is set.
            if std::env::var("TEST_LOG").is_ok() {
                let subscriber = tracing_subscriber::fmt::Subscriber::builder()
                    .with_env_filter(
                        EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("debug")),
                    )
                    .finish();
                set_global_default(subscriber).expect("Failed to set a `tracing` global subscriber")
            }
        });
    }

    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.api_address, path_and_query))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, body: &'static str, content_type: Option<&str>) -> reqwest::Response {
        let mut request = self
            .api_client
            .post(format!("{}/", self.api_address))
            .body(body);
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }
        request.send().await.expect("Failed to execute request.")
    }
}
