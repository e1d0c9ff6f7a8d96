use std::net::SocketAddr;

use anyhow::Error;
use log::{debug, error, info, warn};

pub struct EmberLogger;

impl EmberLogger {
    pub fn preparing_socket(address: &str) {
        info!("Preparing socket {}", address);
    }

    pub fn listening(address: &SocketAddr) {
        info!("Listening on {}", address);
    }

    pub fn tcp_nodelay_failed(err: &std::io::Error) {
        error!("Failed to set TCP_NODELAY: {err}");
    }

    pub fn accept_failed(err: &std::io::Error) {
        error!("Failed to accept connection: {err}");
    }

    pub fn new_connection(address: &SocketAddr) {
        debug!("New connection {}", address);
    }

    pub fn connection_closed(addr: &SocketAddr, err: &Error) {
        debug!("Connection {addr} closed: {err}");
    }

    pub fn status_served(addr: &SocketAddr) {
        debug!("Served status ping to {addr}");
    }

    pub fn player_joined(username: &str, addr: &SocketAddr) {
        info!("Client {username} joined from {addr}");
    }

    pub fn player_removed(username: &str, reason: &str) {
        info!("Client {username} has been removed due to [{reason}]");
    }

    pub fn broadcast_chat(username: &str, msg: &str) {
        info!("Broadcast chat message: <{username}> {msg}");
    }

    pub fn unmanaged_packet(id: i32) {
        warn!("Unmanaged packet id 0x{id:02X}");
    }

    pub fn keep_alive_failed(username: &str, err: &Error) {
        debug!("Keep alive to {username} failed: {err}");
    }

    pub fn port_changed(port: &str) {
        info!("Listener rebound to port {port}");
    }

    pub fn port_change_failed(port: &str, err: &Error) {
        warn!("Failed to rebind listener to port {port}: {err}");
    }

    pub fn server_closing() {
        info!("Server closing, disconnecting everyone");
    }
}
