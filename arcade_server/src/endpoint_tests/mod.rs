mod auth;
mod cart;
mod games;
mod helpers;
mod orders;
