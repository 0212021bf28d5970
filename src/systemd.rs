#[derive(Debug, Clone)]
pub struct ProcessState {
    pub span: tracing::Span,
}

impl ProcessState {
    pub fn new() -> Self {
        Self {
            span: tracing::info_span!("service"),
        }
    }

    fn set(&self, status: &str, states: &[NotifyState]) {
        tracing::debug!(parent: &self.span, status, "Setting service status");
        if let Err(error) = notify(states) {
            tracing::error!(parent: &self.span, ?error, "Failed to notify systemd of state change");
        } else {
            tracing::debug!(
                parent: &self.span,
                status,
                "Successfully notified systemd of service status"
            );
        }
    }

    pub fn set_running(&self) {
        self.set("ready", &[NotifyState::Ready])
    }

    pub fn set_failed(&self) {
        self.set(
            "failed,stopping",
            &[NotifyState::Status("failed"), NotifyState::Stopping],
        )
    }

    pub fn set_finished(&self) {
        self.set("stopping", &[NotifyState::Stopping])
    }
}

/// Daemon notification for the service manager.
#[derive(Clone, Debug)]
enum NotifyState<'a> {
    /// Service startup is finished.
    Ready,

    /// Service is stopping.
    Stopping,

    /// Free-form status message for the service manager.
    Status(&'a str),
}

impl std::fmt::Display for NotifyState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyState::Ready => write!(f, "READY=1"),
            NotifyState::Stopping => write!(f, "STOPPING=1"),
            NotifyState::Status(msg) => write!(f, "STATUS={msg}"),
        }
    }
}

fn notify(state: &[NotifyState]) -> std::io::Result<()> {
    notify_to(std::env::var_os("NOTIFY_SOCKET"), state)
}

fn notify_to(
    socket_path: Option<std::ffi::OsString>,
    state: &[NotifyState],
) -> std::io::Result<()> {
    use std::fmt::Write;

    let Some(socket_path) = socket_path else {
        return Ok(());
    };

    let sock = std::os::unix::net::UnixDatagram::unbound()?;
    sock.connect(socket_path)?;

    let mut msg = String::new();
    for s in state {
        let _ = writeln!(msg, "{s}");
    }

    let len = sock.send(msg.as_bytes())?;

    if len != msg.len() {
        Err(std::io::Error::new(
            std::io::ErrorKind::WriteZero,
            "incomplete write",
        ))
    } else {
        Ok(())
    }
}
