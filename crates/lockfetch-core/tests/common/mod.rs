pub mod fake_fetcher;
