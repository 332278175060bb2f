mod body;
mod helpers;
mod query;
