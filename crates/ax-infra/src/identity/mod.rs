mod gateway;

pub use gateway::HttpCredentialGateway;
