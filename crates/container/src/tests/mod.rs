
mod interceptors;
mod lifecycle;
mod resolution;
