//! In-process HTTP server for tests, serving canned responses from 127.0.0.1 on a random port.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use hyper::{Body, Request, Response, Server, StatusCode};
use hyper::header::{LOCATION, USER_AGENT};
use hyper::service::{make_service_fn, service_fn};

enum Route {
    Content(StatusCode, Bytes),
    Redirect(String),
}

#[derive(Default)]
struct Recorded {
    paths: Vec<String>,
    user_agents: Vec<String>,
}

pub struct TestServerBuilder {
    routes: HashMap<String, Route>,
}
impl TestServerBuilder {
    pub fn with(mut self, path: &str, status: StatusCode, body: impl Into<Bytes>) -> TestServerBuilder {
        self.routes.insert(path.to_string(), Route::Content(status, body.into()));
        self
    }

    pub fn with_redirect(mut self, path: &str, location: &str) -> TestServerBuilder {
        self.routes.insert(path.to_string(), Route::Redirect(location.to_string()));
        self
    }

    pub async fn start(self) -> TestServer {
        let routes = Arc::new(self.routes);
        let recorded: Arc<Mutex<Recorded>> = Default::default();

        let make_service = {
            let recorded = recorded.clone();
            make_service_fn(move |_conn| {
                let routes = routes.clone();
                let recorded = recorded.clone();
                async move {
                    Ok::<_, Infallible>(service_fn(move |request: Request<Body>| {
                        let response = respond(&routes, &recorded, &request);
                        async move { Ok::<_, Infallible>(response) }
                    }))
                }
            })
        };

        let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
            .serve(make_service);
        let addr = server.local_addr();
        tokio::spawn(server);

        TestServer {
            base_url: format!("http://{}", addr),
            recorded,
        }
    }
}

fn respond(routes: &HashMap<String, Route>, recorded: &Mutex<Recorded>, request: &Request<Body>) -> Response<Body> {
    let path = request.uri().path().to_string();
    {
        let mut recorded = recorded.lock().unwrap();
        recorded.paths.push(path.clone());
        if let Some(user_agent) = request.headers().get(USER_AGENT) {
            recorded.user_agents.push(user_agent.to_str().unwrap().to_string());
        }
    }

    match routes.get(&path) {
        Some(Route::Content(status, body)) => Response::builder()
            .status(*status)
            .body(Body::from(body.clone()))
            .unwrap(),
        Some(Route::Redirect(location)) => Response::builder()
            .status(StatusCode::FOUND)
            .header(LOCATION, location.as_str())
            .body(Body::empty())
            .unwrap(),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::empty())
            .unwrap(),
    }
}

pub struct TestServer {
    base_url: String,
    recorded: Arc<Mutex<Recorded>>,
}
impl TestServer {
    pub fn builder() -> TestServerBuilder {
        TestServerBuilder {
            routes: HashMap::new(),
        }
    }

    /// `path` starts with '/'
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.recorded.lock().unwrap().paths.clone()
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.recorded.lock().unwrap().user_agents.clone()
    }
}
