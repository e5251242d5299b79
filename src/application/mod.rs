pub mod ecomm_service;
