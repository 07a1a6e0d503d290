mod euronext_api;
mod yahoo_api;
