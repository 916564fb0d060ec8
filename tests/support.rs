use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Tracks how many requests the test server is holding at once.
pub struct InflightGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InflightGauge {
    fn new() -> Self {
        Self {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    fn enter(&self) {
        let now = self
            .current
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1);
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    gauge: Arc<InflightGauge>,
}

impl ServerHandle {
    #[must_use]
    pub fn gauge(&self) -> Arc<InflightGauge> {
        Arc::clone(&self.gauge)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawns a keep-alive HTTP server answering every request with 200 OK,
/// optionally holding each response for `latency` first.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server(latency: Option<Duration>) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let gauge = Arc::new(InflightGauge::new());
    let accept_gauge = Arc::clone(&gauge);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let client_gauge = Arc::clone(&accept_gauge);
                    thread::spawn(move || handle_client(stream, latency, &client_gauge));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            gauge,
        },
    ))
}

fn handle_client(mut stream: TcpStream, latency: Option<Duration>, gauge: &InflightGauge) {
    let mut buffer = [0u8; 2048];
    loop {
        match stream.read(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        gauge.enter();
        if let Some(delay) = latency {
            thread::sleep(delay);
        }
        let written = stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nOK")
            .and_then(|()| stream.flush());
        gauge.exit();

        if written.is_err() {
            break;
        }
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Runs the `pummel` binary and captures its output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_pummel<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = pummel_bin()?;
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .map_err(|err| format!("run pummel failed: {}", err))
}

fn pummel_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_pummel").map_or_else(
        || Err("CARGO_BIN_EXE_pummel missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
