mod recorder_test;
