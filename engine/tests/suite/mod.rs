mod app;
mod delivery;
mod http;
