mod attempt_audit_tests;
