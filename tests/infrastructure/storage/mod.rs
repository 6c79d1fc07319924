mod s3_object_storage_test;
