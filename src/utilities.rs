pub mod data_url;

#[cfg(test)]
pub mod test_fixtures;
