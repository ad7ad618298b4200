use axum::Router;
use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6};
use std::time::Duration;
use url::Url;

/// A fake backend serving `router` on a random local port until dropped.
pub struct TestServer {
	handle: axum_server::Handle<SocketAddr>,
	address: SocketAddr,
}

impl TestServer {
	pub async fn new(router: Router) -> anyhow::Result<Self> {
		// NOTE: port 0 assigns a random available port
		let socket_address = SocketAddrV6::new(Ipv6Addr::LOCALHOST, 0, 0, 0);

		let (address, handle) = loop {
			let handle = axum_server::Handle::<SocketAddr>::new();
			let server = axum_server::Server::bind(socket_address.into()).handle(handle.clone());

			tokio::spawn(server.serve(router.clone().into_make_service()));

			if let Some(address) = handle.listening().await {
				break (address, handle);
			}
		};

		Ok(Self { handle, address })
	}

	pub fn url(&self, path: &str) -> Url {
		let address = self.address;
		let path = path.trim_start_matches('/');
		Url::parse(&format!("http://{address}/{path}")).expect("Invalid test server URL")
	}
}

impl Drop for TestServer {
	fn drop(&mut self) {
		self.handle.graceful_shutdown(Some(Duration::from_secs(5)));
	}
}
