mod lifecycle;
mod rotation;
mod server;
