//! Open Sound Control (OSC) telemetry over UDP
//!
//! Fire-and-forget: the socket is non-blocking, sends are never retried,
//! and failures are logged once per failure streak then swallowed.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use rosc::{OscMessage, OscPacket, OscType, encoder};

use super::{Metric, TelemetryFrame, TickObserver, publishes};
use crate::error::TelemetryError;
use crate::settings::TelemetrySettings;
use crate::sim::{Snapshot, TickEvent};

/// OSC sender for per-tick metrics
pub struct OscTelemetry {
    socket: UdpSocket,
    target: SocketAddr,
    prefix: String,
    /// Sends that failed since the sink was created
    failed_sends: u64,
    failing: bool,
}

impl OscTelemetry {
    /// Create a sender for `target` (e.g. "127.0.0.1:8000")
    pub fn connect(target: &str, prefix: &str) -> Result<Self, TelemetryError> {
        let target = target
            .to_socket_addrs()
            .map_err(|_| TelemetryError::InvalidAddress(target.to_string()))?
            .next()
            .ok_or_else(|| TelemetryError::InvalidAddress(target.to_string()))?;

        let bind = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind)?;
        socket.set_nonblocking(true)?;

        log::info!("OSC telemetry sending to {}", target);
        Ok(Self {
            socket,
            target,
            prefix: prefix.to_string(),
            failed_sends: 0,
            failing: false,
        })
    }

    pub fn from_settings(settings: &TelemetrySettings) -> Result<Self, TelemetryError> {
        Self::connect(&settings.target(), &settings.prefix)
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn failed_sends(&self) -> u64 {
        self.failed_sends
    }

    fn encode(&self, metric: Metric, value: f32) -> Result<Vec<u8>, TelemetryError> {
        let packet = OscPacket::Message(OscMessage {
            addr: metric.address(&self.prefix),
            args: vec![OscType::Float(value)],
        });
        encoder::encode(&packet).map_err(|e| TelemetryError::Encoding(format!("{:?}", e)))
    }

    fn send(&self, metric: Metric, value: f32) -> Result<(), TelemetryError> {
        let bytes = self.encode(metric, value)?;
        self.socket.send_to(&bytes, self.target)?;
        Ok(())
    }

    /// Attempt one send per metric. Never fails.
    pub fn publish(&mut self, frame: &TelemetryFrame) {
        for metric in Metric::ALL {
            match self.send(metric, frame.value(metric)) {
                Ok(()) => {
                    if self.failing {
                        log::info!("OSC telemetry to {} recovered", self.target);
                        self.failing = false;
                    }
                }
                Err(e) => {
                    self.failed_sends += 1;
                    if !self.failing {
                        log::warn!("OSC telemetry to {} failing: {}", self.target, e);
                        self.failing = true;
                    }
                }
            }
        }
    }
}

impl TickObserver for OscTelemetry {
    fn on_tick(&mut self, snapshot: &Snapshot, event: TickEvent) {
        if publishes(event) {
            self.publish(&TelemetryFrame::from_snapshot(snapshot));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::decoder;
    use std::time::Duration;

    #[test]
    fn test_invalid_address() {
        assert!(matches!(
            OscTelemetry::connect("not an address", "/incense"),
            Err(TelemetryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_send_failures_are_swallowed() {
        // Broadcast without SO_BROADCAST is refused by the OS
        let mut sink = OscTelemetry::connect("255.255.255.255:9", "/incense").unwrap();
        let frame = TelemetryFrame {
            angle: 0.5,
            sincerity: 1.0,
            stability: 1.0,
            progress: 0.0,
        };
        sink.publish(&frame);
        assert_eq!(sink.failed_sends(), 4);

        // Still usable, still counting
        sink.publish(&frame);
        assert_eq!(sink.failed_sends(), 8);
    }

    #[test]
    fn test_publishes_four_messages() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let mut sink = OscTelemetry::connect(&addr.to_string(), "/incense").unwrap();
        sink.publish(&TelemetryFrame {
            angle: 0.5,
            sincerity: 1.0,
            stability: 0.75,
            progress: 0.25,
        });

        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        for _ in 0..4 {
            let (len, _) = listener.recv_from(&mut buf).unwrap();
            let (_, packet) = decoder::decode_udp(&buf[..len]).unwrap();
            match packet {
                OscPacket::Message(msg) => received.push((msg.addr, msg.args)),
                OscPacket::Bundle(_) => panic!("unexpected bundle"),
            }
        }
        received.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(received[0].0, "/incense/angle");
        assert_eq!(received[0].1, vec![OscType::Float(0.5)]);
        assert_eq!(received[1].0, "/incense/sincerity");
        assert_eq!(received[2].0, "/incense/stability");
        assert_eq!(received[2].1, vec![OscType::Float(0.75)]);
        assert_eq!(received[3].0, "/incense/wind");
        assert_eq!(received[3].1, vec![OscType::Float(0.25)]);
        assert_eq!(sink.failed_sends(), 0);
    }
}
