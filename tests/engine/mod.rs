mod configured_chain_test;
mod properties_test;
