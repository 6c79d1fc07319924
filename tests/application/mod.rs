mod output_formatter_test;
mod provider_gateway_test;
mod storage_service_test;
