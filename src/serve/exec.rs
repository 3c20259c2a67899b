use super::handler::{content_type, render_listing, resolve, Resolved};
use super::port::find_available_port;
use crate::cli::ServeArgs;
use crate::error::{ContribError, Result};
use anyhow::Context;
use chrono::Local;
use console::style;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tiny_http::{Header, Method, Request, Response, Server};

pub fn exec(args: ServeArgs) -> anyhow::Result<()> {
    let root = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Cannot serve {}", root.display()))?;

    let mut server = StaticServer::bind(&root, &args.host, args.port, args.max_tries)
        .context("Failed to start static server")?;
    if args.no_viewer {
        server = server.without_viewer();
    }

    println!("Serving at port {}", server.port());
    io::stdout().flush()?;
    eprintln!(
        "{} {} on http://{}:{}/",
        style("Serving").bold(),
        style(root.display()).dim(),
        args.host,
        server.port()
    );

    server.run();
    Ok(())
}

pub struct StaticServer {
    server: Server,
    root: PathBuf,
    port: u16,
    viewer: bool,
}

impl StaticServer {
    pub fn bind(root: &Path, host: &str, start_port: u16, max_tries: u16) -> Result<Self> {
        let (listener, port) = find_available_port(host, start_port, max_tries)?;
        let server =
            Server::from_listener(listener, None).map_err(|e| ContribError::Http(e.to_string()))?;
        Ok(Self {
            server,
            root: root.to_path_buf(),
            port,
            viewer: true,
        })
    }

    /// Plain directory listings at `/` instead of the bundled viewer.
    pub fn without_viewer(mut self) -> Self {
        self.viewer = false;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve requests one at a time until the process is killed.
    pub fn run(&self) {
        for request in self.server.incoming_requests() {
            if let Err(e) = self.handle(request) {
                eprintln!("Error answering request: {e}");
            }
        }
    }

    fn handle(&self, request: Request) -> io::Result<()> {
        let reply = reply_for(&self.root, request.method(), request.url(), self.viewer);
        log_request(&request, reply.status);
        reply.send(request)
    }
}

pub enum Body {
    File(File),
    Bytes(Vec<u8>),
}

pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub location: Option<String>,
    pub body: Body,
}

impl Reply {
    fn text(status: u16, message: &str) -> Self {
        let html = format!(
            "<!DOCTYPE HTML>\n<html><head><title>Error response</title></head>\n\
             <body><h1>Error response</h1><p>Error code: {status}</p><p>Message: {message}.</p></body></html>\n"
        );
        Self {
            status,
            content_type: "text/html; charset=utf-8",
            location: None,
            body: Body::Bytes(html.into_bytes()),
        }
    }

    fn send(self, request: Request) -> io::Result<()> {
        let mut headers = vec![header("Content-Type", self.content_type)];
        if let Some(location) = &self.location {
            headers.push(header("Location", location));
        }
        let headers = headers.into_iter().flatten();

        match self.body {
            Body::File(file) => request.respond(with_headers(
                Response::from_file(file).with_status_code(self.status),
                headers,
            )),
            Body::Bytes(bytes) => request.respond(with_headers(
                Response::from_data(bytes).with_status_code(self.status),
                headers,
            )),
        }
    }
}

pub fn reply_for(root: &Path, method: &Method, url: &str, viewer: bool) -> Reply {
    if !matches!(method, Method::Get | Method::Head) {
        return Reply::text(501, &format!("Unsupported method ('{method}')"));
    }

    match resolve(root, url, viewer) {
        Resolved::File(path) => match File::open(&path) {
            Ok(file) => Reply {
                status: 200,
                content_type: content_type(&path),
                location: None,
                body: Body::File(file),
            },
            Err(_) => Reply::text(404, "File not found"),
        },
        Resolved::Listing(dir) => {
            let url_path = url.split(['?', '#']).next().unwrap_or("/");
            match render_listing(&dir, url_path) {
                Ok(html) => Reply {
                    status: 200,
                    content_type: "text/html; charset=utf-8",
                    location: None,
                    body: Body::Bytes(html.into_bytes()),
                },
                Err(_) => Reply::text(404, "No permission to list directory"),
            }
        }
        Resolved::Redirect(location) => Reply {
            status: 301,
            content_type: "text/html; charset=utf-8",
            location: Some(location),
            body: Body::Bytes(Vec::new()),
        },
        Resolved::Embedded(asset) => Reply {
            status: 200,
            content_type: asset.content_type,
            location: None,
            body: Body::Bytes(asset.body.as_bytes().to_vec()),
        },
        Resolved::NotFound => Reply::text(404, "File not found"),
        Resolved::Forbidden => Reply::text(403, "Forbidden"),
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn with_headers<R: Read>(
    mut response: Response<R>,
    headers: impl Iterator<Item = Header>,
) -> Response<R> {
    for h in headers {
        response.add_header(h);
    }
    response
}

fn log_request(request: &Request, status: u16) {
    let peer = request
        .remote_addr()
        .map(|a| a.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let version = request.http_version();
    eprintln!(
        "{} - - [{}] \"{} {} HTTP/{}.{}\" {} -",
        peer,
        Local::now().format("%d/%b/%Y %H:%M:%S"),
        request.method(),
        request.url(),
        version.0,
        version.1,
        status
    );
}
