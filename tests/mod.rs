mod mcp_server;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Configuration, catalogue and error basics
// - dispatcher_mock: Calendly calls against a mocked API
// - mcp_server: MCP sessions over in-memory pipes
