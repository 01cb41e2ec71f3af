pub mod audit_testkit;
